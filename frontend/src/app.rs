use leptos::*;
use leptos_router::*;

use crate::pages::{achievements::AchievementsPage, not_found::NotFound};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main class="container">
                <Routes>
                    <Route path="/" view=|| view! { <Redirect path="/achievements" /> } />
                    <Route path="/achievements" view=AchievementsPage />
                    <Route path="/*any" view=NotFound />
                </Routes>
            </main>
        </Router>
    }
}
