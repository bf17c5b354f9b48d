//! SQL Editor Component
//!
//! SQL playground over the todo list: example queries, a query box and the
//! history of runs with the GraphQL each one was translated to.

use chrono::Local;
use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::query::{HistoryEntry, EXAMPLE_QUERIES};

use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

const PLACEHOLDER: &str = "Enter your SQL query here...
Example: SELECT id, text, completed FROM todos WHERE completed = false";

#[component]
pub fn SqlEditor() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let (sql, set_sql) = signal(String::new());
    let (selected_example, set_selected_example) = signal::<Option<&'static str>>(None);
    let (executing, set_executing) = signal(false);

    let execute = move |_| {
        let query = sql.get();
        if query.trim().is_empty() {
            return;
        }
        set_executing.set(true);
        spawn_local(async move {
            let translator = ctx.services().translator;
            if let Err(e) = translator.run(&query).await {
                ctx.report(e.to_string());
            }
            store.history().set(translator.history());
            let _ = set_executing.try_set(false);
        });
    };

    view! {
        <div class="sql-editor">
            <div class="sql-editor-header">
                <h2>"🔍 SQL Editor"</h2>
                <p>"Write SQL queries that get translated to GraphQL queries for your database"</p>
            </div>

            <div class="sql-editor-content">
                <div class="query-input-section">
                    <div class="examples-section">
                        <h3>"Example Queries:"</h3>
                        <div class="example-buttons">
                            {EXAMPLE_QUERIES.iter().map(|example| view! {
                                <button
                                    class=move || if selected_example.get() == Some(example.sql) {
                                        "example-btn active"
                                    } else {
                                        "example-btn"
                                    }
                                    on:click=move |_| {
                                        set_sql.set(example.sql.to_string());
                                        set_selected_example.set(Some(example.sql));
                                    }
                                >
                                    {example.name}
                                </button>
                            }).collect_view()}
                        </div>
                    </div>

                    <div class="query-input">
                        <label for="sql-query">"SQL Query:"</label>
                        <textarea
                            id="sql-query"
                            rows=6
                            placeholder=PLACEHOLDER
                            prop:value=move || sql.get()
                            on:input=move |ev| set_sql.set(event_target_value(&ev))
                        ></textarea>
                    </div>

                    <div class="query-actions">
                        <button
                            class="execute-btn"
                            disabled=move || executing.get() || sql.get().trim().is_empty()
                            on:click=execute
                        >
                            {move || if executing.get() { "⏳ Executing..." } else { "▶️ Execute Query" }}
                        </button>
                        <button class="clear-btn" on:click=move |_| set_sql.set(String::new())>
                            "🗑️ Clear"
                        </button>
                    </div>
                </div>

                <div class="query-results-section">
                    <h3>"Query Results:"</h3>
                    {move || {
                        let history = store.history().get();
                        if history.is_empty() {
                            view! {
                                <div class="no-results">
                                    <p>"No queries executed yet. Try running a query above!"</p>
                                </div>
                            }
                            .into_any()
                        } else {
                            view! {
                                <div class="results-container">
                                    {history.entries().iter().cloned().map(|entry| view! {
                                        <QueryResult entry=entry />
                                    }).collect_view()}
                                </div>
                            }
                            .into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
fn QueryResult(entry: HistoryEntry) -> impl IntoView {
    let timestamp = entry.timestamp.with_timezone(&Local).format("%I:%M:%S %p").to_string();
    let class = if entry.is_failure() { "query-result failed" } else { "query-result" };

    view! {
        <div class=class>
            <div class="result-header">
                <div class="result-info">
                    <span class="result-timestamp">{timestamp}</span>
                    <span class="result-query">{entry.preview()}</span>
                </div>
            </div>

            <div class="result-content">
                {entry.graphql.clone().map(|graphql| view! {
                    <details>
                        <summary>"Generated GraphQL Query"</summary>
                        <pre class="graphql-query">{graphql}</pre>
                    </details>
                })}

                <div class="result-data">
                    <h4>"Results:"</h4>
                    <pre class="result-output">{entry.rendered()}</pre>
                </div>
            </div>
        </div>
    }
}
