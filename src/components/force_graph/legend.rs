use leptos::prelude::*;

use super::scene::RenderNode;

/// What the inspector panel shows for the selected node.
#[derive(Clone, Debug, PartialEq)]
pub struct Inspection {
	pub node: usize,
	pub id: String,
	pub node_type: String,
	pub properties: Vec<String>,
}

impl Inspection {
	pub fn of(node: &RenderNode) -> Self {
		Self {
			node: node.index,
			id: node.id().into(),
			node_type: node.node_type().into(),
			properties: node.record().properties.keys().cloned().collect(),
		}
	}
}

/// Side panel listing the inspected node's properties.
///
/// Clicking a row writes the property key into `chosen`; the canvas applies it
/// to every node of the inspected type.
#[component]
pub fn LegendPanel(
	inspection: ReadSignal<Option<Inspection>>,
	chosen: WriteSignal<Option<String>>,
) -> impl IntoView {
	view! {
		<div
			class="legend"
			style:display=move || if inspection.get().is_some() { "block" } else { "none" }
		>
			{move || {
				inspection
					.get()
					.map(|insp| {
						view! {
							<h2 class="legend-type">{insp.node_type.clone()}</h2>
							<p class="legend-id">{insp.id.clone()}</p>
							<ul class="legend-list">
								{insp
									.properties
									.into_iter()
									.map(|key| {
										let label = key.clone();
										view! {
											<li
												class="legend-row"
												on:click=move |_| chosen.set(Some(key.clone()))
											>
												{label}
											</li>
										}
									})
									.collect_view()}
							</ul>
						}
					})
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::SceneConfig;
	use crate::components::force_graph::scene::Scene;
	use crate::components::force_graph::types::{NodeRecord, RawGraph};

	#[test]
	fn inspection_lists_sorted_property_keys() {
		let raw = RawGraph {
			nodes: vec![NodeRecord::new(
				"a",
				"X",
				&[("title", "Alpha"), ("author", "Ann"), ("year", "1999")],
			)],
			links: vec![],
		};
		let scene = Scene::build(raw, &SceneConfig::default()).unwrap();
		let insp = Inspection::of(&scene.nodes[0]);
		assert_eq!(insp.node, 0);
		assert_eq!(insp.id, "a");
		assert_eq!(insp.node_type, "X");
		assert_eq!(insp.properties, ["author", "title", "year"]);
	}
}
