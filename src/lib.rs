//! Browser front end for exploring a Power BI model: upload, natural-language
//! queries, report visuals, measure lineage and DAX complexity.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};
use wasm_bindgen::prelude::wasm_bindgen;

// Modules
mod api;
mod clipboard;
mod complexity;
mod components;
mod config;
mod error;
mod export;
mod lineage;
mod page_data;
mod pages;
mod query;
mod table;
mod timer;
mod upload;

use crate::components::toast::{ToastHost, Toasts};
use crate::config::AppConfig;

// Top-Level pages
use crate::pages::dax_explorer::DaxExplorer;
use crate::pages::home::Home;
use crate::pages::lineage_view::LineageView;
use crate::pages::not_found::NotFound;
use crate::pages::table_view::TableView;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app shell: navigation, toasts and one route per view.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::load();
	provide_context(Toasts::new(config.toast_timeout_ms));
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Model Lens" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<nav class="navbar">
				<A href="/">"Upload"</A>
				<A href="/table-view">"Visuals"</A>
				<A href="/lineage-view">"Lineage"</A>
				<A href="/dax-expressions">"DAX"</A>
			</nav>
			<main class="container">
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/table-view") view=TableView />
					<Route path=path!("/lineage-view") view=LineageView />
					<Route path=path!("/dax-expressions") view=DaxExplorer />
				</Routes>
			</main>
		</Router>
		<ToastHost />
	}
}

/// Entry point run when the WASM module loads.
#[wasm_bindgen(start)]
pub fn start() {
	init_logging();
	mount_to_body(App);
}
