use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::LoadError;
use super::types::RawGraph;

pub fn parse_graph(text: &str) -> Result<RawGraph, LoadError> {
	serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
}

/// Fetch and parse the graph document at `url`. No retry.
pub async fn load_graph(url: &str) -> Result<RawGraph, LoadError> {
	let window =
		web_sys::window().ok_or_else(|| LoadError::Fetch("no window available".into()))?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| LoadError::Fetch(js_message(&e)))?;
	let response: Response = response
		.dyn_into()
		.map_err(|e| LoadError::Fetch(js_message(&e)))?;
	if !response.ok() {
		return Err(LoadError::Status(response.status()));
	}

	let body = response
		.text()
		.map_err(|e| LoadError::Body(js_message(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| LoadError::Body(js_message(&e)))?
		.as_string()
		.ok_or_else(|| LoadError::Body("response body is not text".into()))?;
	parse_graph(&text)
}

fn js_message(value: &wasm_bindgen::JsValue) -> String {
	value
		.as_string()
		.or_else(|| {
			value
				.dyn_ref::<js_sys::Error>()
				.map(|e| String::from(e.message()))
		})
		.unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_nodes_links_and_properties() {
		let raw = parse_graph(
			r#"{
				"nodes": [
					{ "id": "a", "type": "X", "properties": { "title": "Alpha" } },
					{ "id": "b", "type": "Y" }
				],
				"links": [{ "source": "a", "target": "b", "value": 4 }]
			}"#,
		)
		.unwrap();

		assert_eq!(raw.nodes.len(), 2);
		assert_eq!(raw.nodes[0].node_type, "X");
		assert_eq!(raw.nodes[0].properties["title"], "Alpha");
		assert!(raw.nodes[1].properties.is_empty());
		assert_eq!(raw.links[0].value, 4.0);
	}

	#[test]
	fn link_value_defaults_to_one() {
		let raw = parse_graph(r#"{ "nodes": [], "links": [{ "source": "a", "target": "b" }] }"#)
			.unwrap();
		assert_eq!(raw.links[0].value, 1.0);
	}

	#[test]
	fn malformed_document_is_a_parse_error() {
		assert!(matches!(
			parse_graph(r#"{ "nodes": [{ "id": 3 }] }"#),
			Err(LoadError::Parse(_))
		));
		assert!(matches!(parse_graph("not json"), Err(LoadError::Parse(_))));
	}
}
