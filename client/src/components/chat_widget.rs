//! Floating chat assistant widget: transcript, typing indicator, input.

use leptos::prelude::*;

use crate::app::FrameSender;
use crate::net::types::Frame;
use crate::state::chat::{ChatState, TurnRole};
use crate::state::ui::UiState;

/// Chat toggle button plus the conversation panel.
///
/// A send opens the exchange locally (user turn + empty assistant turn) and
/// ships the prior history with the new message; item frames grow the
/// assistant turn as they stream in.
#[component]
pub fn ChatWidget() -> impl IntoView {
    let chat = expect_context::<RwSignal<ChatState>>();
    let ui = expect_context::<RwSignal<UiState>>();
    let sender = expect_context::<RwSignal<FrameSender>>();

    let input = RwSignal::new(String::new());
    let messages_ref = NodeRef::<leptos::html::Div>::new();

    // Keep the transcript pinned to the newest message.
    Effect::new(move || {
        let _ = chat.get().turns.len();

        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = messages_ref.get() {
                let scroll_height = el.scroll_height();
                el.set_scroll_top(scroll_height);
            }
        }
    });

    let do_send = move || {
        let text = input.get().trim().to_owned();
        if text.is_empty() || chat.get().streaming {
            return;
        }

        // History is the transcript before this exchange.
        let history: Vec<serde_json::Value> = chat
            .get()
            .turns
            .iter()
            .map(|turn| serde_json::json!({ "role": turn.role.as_str(), "text": turn.text }))
            .collect();

        let frame = Frame::request(
            "chat:send",
            serde_json::json!({ "history": history, "message": text }),
        );
        chat.update(|c| c.begin_turn(text));
        sender.get().send(&frame);
        input.set(String::new());
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            do_send();
        }
    };

    view! {
        <button
            class="chat-widget__toggle"
            title="AI Assistant"
            on:click=move |_| ui.update(|u| u.chat_open = !u.chat_open)
        >
            {move || if ui.get().chat_open { "✕" } else { "Chat" }}
        </button>

        {move || {
            ui.get()
                .chat_open
                .then(|| {
                    view! {
                        <div class="chat-widget">
                            <header class="chat-widget__header">
                                <h3>"AI Assistant"</h3>
                                <button
                                    class="chat-widget__close"
                                    on:click=move |_| ui.update(|u| u.chat_open = false)
                                >
                                    "✕"
                                </button>
                            </header>
                            <div class="chat-widget__messages" node_ref=messages_ref>
                                {move || {
                                    chat.get()
                                        .turns
                                        .iter()
                                        .map(|turn| {
                                            let is_user = turn.role == TurnRole::User;
                                            let text = turn.text.clone();
                                            view! {
                                                <div
                                                    class="chat-widget__message"
                                                    class:chat-widget__message--user=is_user
                                                >
                                                    <p class="chat-widget__text">{text}</p>
                                                </div>
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                }}
                                {move || {
                                    chat.get()
                                        .streaming
                                        .then(|| {
                                            view! {
                                                <div class="chat-widget__typing">
                                                    <span></span>
                                                    <span></span>
                                                    <span></span>
                                                </div>
                                            }
                                        })
                                }}
                            </div>
                            <footer class="chat-widget__input-row">
                                <input
                                    class="chat-widget__input"
                                    type="text"
                                    placeholder="Ask anything..."
                                    prop:value=move || input.get()
                                    on:input=move |ev| input.set(event_target_value(&ev))
                                    on:keydown=on_keydown
                                    disabled=move || chat.get().streaming
                                />
                                <button
                                    class="btn btn--primary chat-widget__send"
                                    disabled=move || {
                                        chat.get().streaming || input.get().trim().is_empty()
                                    }
                                    on:click=move |_| do_send()
                                >
                                    "Send"
                                </button>
                            </footer>
                        </div>
                    }
                })
        }}
    }
}
