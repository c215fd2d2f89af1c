use std::fmt;

/// Failure to obtain a [`RawGraph`](super::RawGraph) from the input document.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadError {
	/// The request could not be issued or the network rejected it.
	Fetch(String),
	/// The server answered with a non-success status.
	Status(u16),
	/// The response body could not be read as text.
	Body(String),
	/// The document is not a valid graph description.
	Parse(String),
}

/// Which end of a link failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
	Source,
	Target,
}

/// Data-integrity problems found while building a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneError {
	/// Two node records share an id.
	DuplicateNode(String),
	/// A link endpoint names no node.
	UnresolvedEndpoint {
		link: usize,
		end: Endpoint,
		id: String,
	},
}

impl fmt::Display for LoadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LoadError::Fetch(msg) => write!(f, "failed to fetch graph: {msg}"),
			LoadError::Status(code) => write!(f, "graph request returned HTTP {code}"),
			LoadError::Body(msg) => write!(f, "failed to read graph body: {msg}"),
			LoadError::Parse(msg) => write!(f, "invalid graph document: {msg}"),
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Endpoint::Source => "source",
			Endpoint::Target => "target",
		})
	}
}

impl fmt::Display for SceneError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SceneError::DuplicateNode(id) => write!(f, "duplicate node id '{id}'"),
			SceneError::UnresolvedEndpoint { link, end, id } => {
				write!(f, "link #{link} {end} references unknown node '{id}'")
			}
		}
	}
}

impl std::error::Error for LoadError {}
impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_offending_data() {
		let e = SceneError::UnresolvedEndpoint {
			link: 3,
			end: Endpoint::Source,
			id: "zed".into(),
		};
		assert_eq!(e.to_string(), "link #3 source references unknown node 'zed'");
		assert_eq!(
			LoadError::Status(404).to_string(),
			"graph request returned HTTP 404"
		);
	}
}
