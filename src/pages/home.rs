use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use log::{error, info};

use crate::components::force_graph::{ForceGraphCanvas, RawGraph, load_graph};

/// Graph document served next to `index.html`, used when the route names none.
const DATA_URL: &str = "data.json";

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let source = use_params_map()
		.read_untracked()
		.get("file")
		.map(|file| format!("/{file}"))
		.unwrap_or_else(|| DATA_URL.to_string());
	let (graph, set_graph) = signal(None::<RawGraph>);
	let (load_error, set_load_error) = signal(None::<String>);

	wasm_bindgen_futures::spawn_local(async move {
		match load_graph(&source).await {
			Ok(raw) => {
				info!(
					"Loaded {}: {} nodes, {} links",
					source,
					raw.nodes.len(),
					raw.links.len()
				);
				set_graph.set(Some(raw));
			}
			Err(e) => {
				error!("{source}: {e}");
				set_load_error.set(Some(e.to_string()));
			}
		}
	});

	view! {
		<div class="fullscreen-graph" id="svg-container">
			<ForceGraphCanvas data=graph fullscreen=true />
			<div class="graph-overlay">
				<h1>"Force-Directed Graph"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Click a node to inspect it. Click the background to close the legend."
				</p>
				{move || load_error.get().map(|msg| view! { <p class="load-error">{msg}</p> })}
			</div>
		</div>
	}
}
