//! The assistant page and the endpoint that answers chat messages.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    assistant::responses::{QUICK_QUESTIONS, respond},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    profile::{ProfileId, get_profile},
};

const USER_BUBBLE_STYLE: &str = "ml-auto max-w-[80%] rounded-lg px-4 py-2 \
    bg-blue-600 text-white whitespace-pre-wrap";
const ASSISTANT_BUBBLE_STYLE: &str = "mr-auto max-w-[80%] rounded-lg px-4 py-2 \
    bg-gray-100 text-gray-900 whitespace-pre-wrap dark:bg-gray-700 dark:text-white";
const QUICK_QUESTION_STYLE: &str = "px-3 py-1.5 rounded-full border border-gray-300 \
    text-sm hover:bg-gray-100 dark:border-gray-600 dark:hover:bg-gray-700";

/// The state needed to display the assistant page.
#[derive(Debug, Clone)]
pub struct AssistantState {
    /// The database connection for reading the profile.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AssistantState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for sending a message to the assistant.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    /// What the user asked.
    pub message: String,
}

/// Renders the chat page, greeting the user by the name on their profile.
pub async fn get_assistant_page(
    State(state): State<AssistantState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let profile = get_profile(profile_id, &connection)
        .inspect_err(|error| tracing::error!("could not get profile {profile_id}: {error}"))?;

    Ok(assistant_view(&profile.name).into_response())
}

/// Answers a chat message with the user's message and the assistant's reply.
///
/// Blank messages get an empty 204 response so nothing is added to the chat.
pub async fn send_message_endpoint(Form(form): Form<MessageForm>) -> Response {
    let message = form.message.trim();

    if message.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    html!(
        (user_bubble(message))
        (assistant_bubble(respond(message)))
    )
    .into_response()
}

fn user_bubble(message: &str) -> Markup {
    html!(
        div class="flex" data-message="user"
        {
            p class=(USER_BUBBLE_STYLE) { (message) }
        }
    )
}

fn assistant_bubble(message: &str) -> Markup {
    html!(
        div class="flex" data-message="assistant"
        {
            p class=(ASSISTANT_BUBBLE_STYLE) { (message) }
        }
    )
}

fn greeting(name: &str) -> String {
    format!(
        "Hi {name}! I'm your personal finance assistant. Ask me about saving, \
        investing, budgeting or your financial goals."
    )
}

fn assistant_view(name: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::ASSISTANT_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-2xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Financial Assistant" }

                div
                    id="chat-messages"
                    class="flex flex-col gap-3 min-h-[300px] max-h-[60vh] overflow-y-auto
                        p-4 rounded-lg border border-gray-200 dark:border-gray-700"
                {
                    (assistant_bubble(&greeting(name)))
                }

                div class="flex flex-wrap gap-2" data-quick-questions="true"
                {
                    @for question in QUICK_QUESTIONS {
                        button
                            type="button"
                            hx-post=(endpoints::ASSISTANT_MESSAGES)
                            hx-vals=(format!(r#"{{"message": "{question}"}}"#))
                            hx-target="#chat-messages"
                            hx-swap="beforeend scroll:bottom"
                            class=(QUICK_QUESTION_STYLE)
                        {
                            (question)
                        }
                    }
                }

                form
                    hx-post=(endpoints::ASSISTANT_MESSAGES)
                    hx-target="#chat-messages"
                    hx-swap="beforeend scroll:bottom"
                    data-reset-on-success="true"
                    class="flex gap-2"
                {
                    input
                        type="text"
                        name="message"
                        placeholder="Ask me anything about your finances..."
                        autocomplete="off"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    div class="w-24"
                    {
                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Send" }
                    }
                }
            }
        }
    );

    base("Assistant", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        db::initialize,
        endpoints,
        profile::{ProfileId, create_profile, test_profile},
        test_utils::{
            assert_form_input, assert_form_submit_button_with_text, assert_hx_endpoint,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
            parse_html_fragment,
        },
    };

    use super::{AssistantState, MessageForm, get_assistant_page, send_message_endpoint};

    fn get_state() -> (AssistantState, ProfileId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let profile_id = create_profile(test_profile(), &conn).unwrap().id;

        (
            AssistantState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            profile_id,
        )
    }

    #[tokio::test]
    async fn page_greets_user_by_name() {
        let (state, profile_id) = get_state();

        let response = get_assistant_page(State(state), Extension(profile_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let messages: String = html
            .select(&Selector::parse("#chat-messages").unwrap())
            .next()
            .expect("no chat messages container")
            .text()
            .collect();
        assert!(messages.contains("Hi Alex!"), "got {messages:?}");
    }

    #[tokio::test]
    async fn page_has_quick_questions_and_message_form() {
        let (state, profile_id) = get_state();

        let response = get_assistant_page(State(state), Extension(profile_id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let questions: Vec<String> = html
            .select(&Selector::parse("[data-quick-questions] button").unwrap())
            .map(|button| {
                assert_eq!(
                    button.value().attr("hx-post"),
                    Some(endpoints::ASSISTANT_MESSAGES)
                );
                button.text().collect::<String>().trim().to_owned()
            })
            .collect();
        assert_eq!(
            questions,
            vec![
                "How can I save more money?",
                "Should I invest more?",
                "Help me budget better",
                "Optimize my goals",
            ]
        );

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::ASSISTANT_MESSAGES, "hx-post");
        assert_form_input(&form, "message", "text");
        assert_form_submit_button_with_text(&form, "Send");
    }

    #[tokio::test]
    async fn message_gets_user_and_assistant_bubbles() {
        let response = send_message_endpoint(Form(MessageForm {
            message: "How should I budget?".to_owned(),
        }))
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let user: String = html
            .select(&Selector::parse("[data-message=user]").unwrap())
            .next()
            .expect("no user message")
            .text()
            .collect();
        assert_eq!(user.trim(), "How should I budget?");
        let reply: String = html
            .select(&Selector::parse("[data-message=assistant]").unwrap())
            .next()
            .expect("no assistant message")
            .text()
            .collect();
        assert!(reply.contains("50/30/20"), "got {reply:?}");
    }

    #[tokio::test]
    async fn blank_message_returns_no_content() {
        let response = send_message_endpoint(Form(MessageForm {
            message: "   ".to_owned(),
        }))
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
