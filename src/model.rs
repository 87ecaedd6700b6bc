use serde::{Deserialize, Serialize};

/// A roadmap definition document as loaded from disk or the staged slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapDoc {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl RawNode {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content: None,
            prerequisites: None,
            group: None,
            x: None,
            y: None,
        }
    }

    pub fn with_prerequisites(mut self, prereqs: &[&str]) -> Self {
        self.prerequisites = Some(prereqs.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }
}

/// Derived prerequisite edge. Both endpoints are known node ids by
/// construction; duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_deserializes_minimal() {
        let doc: RoadmapDoc =
            serde_json::from_str(r#"{"title":"T","nodes":[{"id":"a","title":"A"}]}"#).unwrap();
        assert!(doc.id.is_none());
        assert_eq!(doc.nodes.len(), 1);
        assert!(doc.nodes[0].prerequisites.is_none());
    }

    #[test]
    fn doc_rejects_missing_node_id() {
        let result = serde_json::from_str::<RoadmapDoc>(r#"{"nodes":[{"title":"A"}]}"#);
        assert!(result.is_err());
    }
}
