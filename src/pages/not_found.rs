use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"No such view"</h1>
		<p>"Only the device traffic dashboard is served here."</p>
		<a href="/">"Back to the dashboard"</a>
	}
}
