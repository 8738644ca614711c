use leptos::prelude::*;

use crate::components::query_chat::QueryChat;
use crate::components::upload::UploadArea;

/// Model upload and the question panel.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<section class="upload-section">
			<h2>"Upload a model"</h2>
			<UploadArea />
		</section>

		<section class="query-section">
			<h2>"Ask about your model"</h2>
			<QueryChat />
		</section>
	}
}
