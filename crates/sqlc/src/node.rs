use serde_yaml::{Mapping, Value};

/// Tagged tree view of a YAML document
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Key/value pairs in document order
    Mapping(Vec<(Value, ConfigNode)>),
    List(Vec<ConfigNode>),
    /// Strings, numbers, booleans, null and tagged values, kept opaque
    Scalar(Value),
}

impl ConfigNode {
    /// Value stored under a string key of a mapping
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            ConfigNode::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigNode> {
        match self {
            ConfigNode::Mapping(entries) => entries
                .iter_mut()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<ConfigNode>> {
        match self {
            ConfigNode::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigNode::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, ConfigNode::Mapping(_))
    }

    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Value::String(value.into()))
    }

    /// Short description of the node shape, for log messages
    pub fn shape(&self) -> &'static str {
        match self {
            ConfigNode::Mapping(_) => "mapping",
            ConfigNode::List(_) => "list",
            ConfigNode::Scalar(Value::Null) => "null",
            ConfigNode::Scalar(_) => "scalar",
        }
    }
}

impl From<Value> for ConfigNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Mapping(mapping) => ConfigNode::Mapping(
                mapping
                    .into_iter()
                    .map(|(k, v)| (k, ConfigNode::from(v)))
                    .collect(),
            ),
            Value::Sequence(items) => {
                ConfigNode::List(items.into_iter().map(ConfigNode::from).collect())
            }
            other => ConfigNode::Scalar(other),
        }
    }
}

impl From<ConfigNode> for Value {
    fn from(node: ConfigNode) -> Self {
        match node {
            ConfigNode::Mapping(entries) => {
                let mut mapping = Mapping::new();
                for (k, v) in entries {
                    mapping.insert(k, Value::from(v));
                }
                Value::Mapping(mapping)
            }
            ConfigNode::List(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            ConfigNode::Scalar(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_document_order() {
        let text = "version: '2'\nsql:\n- engine: postgresql\n  queries:\n  - query/a.sql\n";
        let value: Value = serde_yaml::from_str(text).unwrap();
        let node = ConfigNode::from(value.clone());

        let keys: Vec<_> = match &node {
            ConfigNode::Mapping(entries) => entries.iter().filter_map(|(k, _)| k.as_str()).collect(),
            _ => panic!("mapping expected"),
        };
        assert_eq!(keys, vec!["version", "sql"]);
        assert_eq!(Value::from(node), value);
    }

    #[test]
    fn accessors_match_shapes() {
        let mut node = ConfigNode::from(
            serde_yaml::from_str::<Value>("sql:\n- queries: [a.sql]\nname: x\n").unwrap(),
        );
        assert_eq!(node.get("name").and_then(ConfigNode::as_str), Some("x"));
        assert!(node.get("missing").is_none());
        assert_eq!(node.get("sql").map(ConfigNode::shape), Some("list"));
        assert!(node.get_mut("sql").and_then(ConfigNode::as_list_mut).is_some());
        assert!(node.get_mut("name").and_then(ConfigNode::as_list_mut).is_none());
    }
}
