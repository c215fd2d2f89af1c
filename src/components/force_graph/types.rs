use std::collections::BTreeMap;

use serde::Deserialize;

/// A node as declared in the input document.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NodeRecord {
	pub id: String,
	#[serde(rename = "type")]
	pub node_type: String,
	#[serde(default)]
	pub properties: BTreeMap<String, String>,
}

/// A link as declared in the input document; endpoints are node ids.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LinkRecord {
	pub source: String,
	pub target: String,
	#[serde(default = "default_link_value")]
	pub value: f64,
}

fn default_link_value() -> f64 {
	1.0
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawGraph {
	#[serde(default)]
	pub nodes: Vec<NodeRecord>,
	#[serde(default)]
	pub links: Vec<LinkRecord>,
}

#[cfg(test)]
impl NodeRecord {
	pub fn new(id: &str, node_type: &str, properties: &[(&str, &str)]) -> Self {
		Self {
			id: id.into(),
			node_type: node_type.into(),
			properties: properties
				.iter()
				.map(|(k, v)| (k.to_string(), v.to_string()))
				.collect(),
		}
	}
}

#[cfg(test)]
impl LinkRecord {
	pub fn new(source: &str, target: &str, value: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
		}
	}
}
