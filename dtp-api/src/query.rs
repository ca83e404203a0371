//! Two-stage graph count queries.
//!
//! Stage one selects a node by IRI and follows one relation, naming the
//! result set with an alias. Stage two filters that set by class membership
//! (subclasses included) and, optionally, by one property value.

use config::DtpSettings;
use errors::MappingError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Which way the relation is followed from the source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Outgoing => "->",
            Self::Incoming => "<-"
        }
    }
}

/// Property filter applied to the aliased set: `<term uri>: <value>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub term: String,
    pub value: Value
}

/// A count of nodes related to one source node.
///
/// Terms are ontology *names*; they are resolved to URIs against
/// [`DtpSettings`] when the body is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountQuery {
    pub node_iri: String,
    pub relation_term: String,
    pub target_class_term: String,
    pub direction: Direction,
    pub alias: String,
    pub filter: Option<PropertyFilter>
}

impl CountQuery {
    /// The alias defaults to the relation term.
    pub fn new(
        node_iri: impl Into<String>,
        relation_term: impl Into<String>,
        target_class_term: impl Into<String>,
        direction: Direction
    ) -> Self {
        let relation_term = relation_term.into();
        Self {
            node_iri: node_iri.into(),
            alias: relation_term.clone(),
            relation_term,
            target_class_term: target_class_term.into(),
            direction,
            filter: None
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_filter(mut self, term: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(PropertyFilter {
            term: term.into(),
            value: value.into()
        });
        self
    }

    /// Build the request body.
    ///
    /// Every ontology term is resolved before anything is assembled, so a
    /// missing term fails without producing a partial body.
    pub fn build(&self, settings: &DtpSettings) -> Result<Value, MappingError> {
        let relation_uri = settings.ontology_uri(&self.relation_term)?;
        let class_uri = settings.ontology_uri(&self.target_class_term)?;
        let filter = match &self.filter {
            Some(filter) => Some((settings.ontology_uri(&filter.term)?, &filter.value)),
            None => None
        };
        let domain = settings.domain();

        let mut source = Map::new();
        source.insert("$domain".to_string(), json!(domain));
        source.insert("$iri".to_string(), json!(self.node_iri));
        source.insert(
            format!("{}{}", self.direction.arrow(), relation_uri),
            json!({ "$alias": self.alias })
        );

        let mut target = Map::new();
        target.insert("$alias".to_string(), json!(self.alias));
        target.insert("$domain".to_string(), json!(domain));
        target.insert(
            "$classes".to_string(),
            json!({
                "$contains": class_uri,
                "$inheritance": true
            })
        );
        if let Some((property_uri, value)) = filter {
            target.insert(property_uri.to_string(), value.clone());
        }

        Ok(json!({
            "query": [Value::Object(source), Value::Object(target)],
            "edge": true,
            "return": self.alias
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{DtpConfigFile, UriMappings};
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> DtpSettings {
        let config = DtpConfigFile {
            dtp_domain: "https://dtp.example.org".to_string(),
            kpi_domain: "https://kpi.example.org".to_string(),
            log_dir: dir.path().join("logs").display().to_string(),
            dev_token: None,
            auth_url: None
        };
        let mut mappings = UriMappings::default();
        for (term, uri) in [
            ("intentStatusRelation", "https://onto/intentStatusRelation"),
            ("classElement", "https://onto/Element"),
            ("isAsDesigned", "https://onto/isAsDesigned"),
            ("hasTask", "https://onto/hasTask"),
            ("task", "https://onto/Task")
        ] {
            mappings.ontology_uris.insert(term.to_string(), uri.to_string());
        }
        DtpSettings::from_parts(config, mappings, "token").unwrap()
    }

    #[test]
    fn test_outgoing_query_body() {
        let dir = TempDir::new().unwrap();
        let body = CountQuery::new("https://node/1", "hasTask", "task", Direction::Outgoing)
            .build(&settings(&dir))
            .unwrap();

        assert_eq!(
            body,
            json!({
                "query": [
                    {
                        "$domain": "https://dtp.example.org/",
                        "$iri": "https://node/1",
                        "->https://onto/hasTask": { "$alias": "hasTask" }
                    },
                    {
                        "$alias": "hasTask",
                        "$domain": "https://dtp.example.org/",
                        "$classes": {
                            "$contains": "https://onto/Task",
                            "$inheritance": true
                        }
                    }
                ],
                "edge": true,
                "return": "hasTask"
            })
        );
    }

    #[test]
    fn test_incoming_query_with_filter() {
        let dir = TempDir::new().unwrap();
        let body = CountQuery::new(
            "https://node/2",
            "intentStatusRelation",
            "classElement",
            Direction::Incoming
        )
        .with_alias("asbuilt")
        .with_filter("isAsDesigned", false)
        .build(&settings(&dir))
        .unwrap();

        assert_eq!(body["return"], "asbuilt");
        assert_eq!(
            body["query"][0]["<-https://onto/intentStatusRelation"],
            json!({ "$alias": "asbuilt" })
        );
        assert_eq!(body["query"][1]["$alias"], "asbuilt");
        assert_eq!(body["query"][1]["https://onto/isAsDesigned"], json!(false));
    }

    #[test]
    fn test_unknown_term_fails() {
        let dir = TempDir::new().unwrap();
        let result = CountQuery::new("https://node/3", "hasGeometricDefect", "task", Direction::Outgoing)
            .build(&settings(&dir));

        assert_eq!(
            result,
            Err(MappingError::UnknownTerm {
                term: "hasGeometricDefect".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_filter_term_fails() {
        let dir = TempDir::new().unwrap();
        let result = CountQuery::new("https://node/4", "hasTask", "task", Direction::Outgoing)
            .with_filter("isDone", true)
            .build(&settings(&dir));

        assert!(matches!(result, Err(MappingError::UnknownTerm { term }) if term == "isDone"));
    }

    #[test]
    fn test_direction_arrows() {
        assert_eq!(Direction::Outgoing.arrow(), "->");
        assert_eq!(Direction::Incoming.arrow(), "<-");
    }
}
