//! Application title bar.

use leptos::prelude::*;

/// Top header with the product name.
#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="header__brand">
                <span class="header__logo">"SB"</span>
                <h1 class="header__title">"SceneBoard"</h1>
                <span class="header__subtitle">"AI Storyboard Assistant"</span>
            </div>
        </header>
    }
}
