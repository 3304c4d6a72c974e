//! UML diagram descriptions.
//!
//! The backend emits one loosely shaped JSON object for every diagram kind.
//! [`DiagramSpec`] is the tagged form the layout engines dispatch on. A
//! non-empty `mermaid` field always wins and yields [`DiagramSpec::Markup`];
//! otherwise the case-insensitive `type` field selects the variant, with
//! class diagrams as the fallback for absent or unknown types.

use std::{fmt, str::FromStr};

use indexmap::IndexSet;
use log::{debug, trace};
use serde::Deserialize;

use super::lenient;
use crate::SextantError;

/// Structural diagram kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    #[default]
    Class,
    Sequence,
    Activity,
    UseCase,
}

impl DiagramKind {
    /// Returns the lowercase name used by the backend
    pub fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Sequence => "sequence",
            Self::Activity => "activity",
            Self::UseCase => "usecase",
        }
    }

    /// Parses a backend type string, falling back to [`DiagramKind::Class`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant::model::diagram::DiagramKind;
    /// assert_eq!(DiagramKind::parse_lenient("Sequence"), DiagramKind::Sequence);
    /// assert_eq!(DiagramKind::parse_lenient("state"), DiagramKind::Class);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for DiagramKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "sequence" => Ok(Self::Sequence),
            "activity" => Ok(Self::Activity),
            "usecase" => Ok(Self::UseCase),
            other => Err(format!("unknown diagram type `{other}`")),
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A class box: name plus member lists.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassBox {
    #[serde(deserialize_with = "lenient::optional_text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::strings")]
    attributes: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    methods: Vec<String>,
}

impl ClassBox {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    /// Returns the class name, `None` when absent or empty
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

/// A relationship between two classes, referenced by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Relationship {
    #[serde(deserialize_with = "lenient::optional_text")]
    from: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    to: Option<String>,
    #[serde(alias = "type", deserialize_with = "lenient::optional_text")]
    kind: Option<String>,
}

impl Relationship {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            kind: None,
        }
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Free-form relationship kind (association, inheritance, ...)
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassDiagram {
    classes: Vec<ClassBox>,
    relationships: Vec<Relationship>,
}

impl ClassDiagram {
    pub fn new(classes: Vec<ClassBox>, relationships: Vec<Relationship>) -> Self {
        Self {
            classes,
            relationships,
        }
    }

    pub fn classes(&self) -> &[ClassBox] {
        &self.classes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}

/// A message between two lifelines.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Message {
    #[serde(deserialize_with = "lenient::optional_text")]
    from: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    to: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    label: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    order: Option<f64>,
}

impl Message {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Returns the label, `None` when absent or empty
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| !label.is_empty())
    }

    /// Sort key; a missing or non-numeric order counts as 0
    pub fn order(&self) -> f64 {
        self.order.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceDiagram {
    lifelines: Vec<String>,
    messages: Vec<Message>,
}

impl SequenceDiagram {
    /// Creates a sequence diagram. Repeated lifeline names are dropped after
    /// their first occurrence.
    pub fn new(lifelines: Vec<String>, messages: Vec<Message>) -> Self {
        let unique: IndexSet<String> = lifelines.into_iter().collect();
        Self {
            lifelines: unique.into_iter().collect(),
            messages,
        }
    }

    pub fn lifelines(&self) -> &[String] {
        &self.lifelines
    }

    /// Messages in declaration order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages stable-sorted ascending by order; ties keep declaration order.
    pub fn messages_in_order(&self) -> Vec<&Message> {
        let mut sorted: Vec<&Message> = self.messages.iter().collect();
        sorted.sort_by(|a, b| a.order().total_cmp(&b.order()));
        sorted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActivityNode {
    #[serde(deserialize_with = "lenient::text")]
    id: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    label: Option<String>,
}

impl ActivityNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Text shown in the node: the label when present, otherwise the id
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(&self.id)
    }
}

/// A directed edge between two activity nodes, referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowEdge {
    #[serde(alias = "source", deserialize_with = "lenient::optional_text")]
    from: Option<String>,
    #[serde(alias = "target", deserialize_with = "lenient::optional_text")]
    to: Option<String>,
}

impl FlowEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityDiagram {
    nodes: Vec<ActivityNode>,
    edges: Vec<FlowEdge>,
}

impl ActivityDiagram {
    pub fn new(nodes: Vec<ActivityNode>, edges: Vec<FlowEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[ActivityNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Index of the first node declared with `id`
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseCaseDiagram {
    actors: Vec<String>,
    use_cases: Vec<String>,
}

impl UseCaseDiagram {
    pub fn new(actors: Vec<String>, use_cases: Vec<String>) -> Self {
        Self { actors, use_cases }
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn use_cases(&self) -> &[String] {
        &self.use_cases
    }
}

/// A diagram ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramSpec {
    /// Textual diagram markup handed to an external engine
    Markup(String),
    Class(ClassDiagram),
    Sequence(SequenceDiagram),
    Activity(ActivityDiagram),
    UseCase(UseCaseDiagram),
}

impl Default for DiagramSpec {
    fn default() -> Self {
        Self::Class(ClassDiagram::default())
    }
}

impl DiagramSpec {
    /// Decodes a diagram from backend JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Json`] when the text is not a JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sextant::model::diagram::DiagramSpec;
    /// let spec = DiagramSpec::from_json(r#"{"type": "SEQUENCE", "actors": ["a", "b"]}"#).unwrap();
    /// assert_eq!(spec.kind_name(), "sequence");
    ///
    /// let spec = DiagramSpec::from_json(r#"{"type": "class", "mermaid": "graph TD; A-->B"}"#).unwrap();
    /// assert_eq!(spec.kind_name(), "markup");
    /// ```
    pub fn from_json(source: &str) -> Result<Self, SextantError> {
        let value: serde_json::Value = serde_json::from_str(source)?;
        Self::from_value(value, DiagramKind::Class)
    }

    /// Decodes a diagram from an already parsed JSON value.
    ///
    /// `fallback` is used when the payload carries no `type` field, which is
    /// the case for saved records whose type is stored next to the payload.
    pub fn from_value(
        value: serde_json::Value,
        fallback: DiagramKind,
    ) -> Result<Self, SextantError> {
        let raw: RawDiagram = serde_json::from_value(value)?;
        let spec = raw.into_spec(fallback);
        debug!(kind = spec.kind_name(); "Diagram decoded");
        Ok(spec)
    }

    /// Returns the lowercase name of the variant
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Markup(_) => "markup",
            Self::Class(_) => DiagramKind::Class.name(),
            Self::Sequence(_) => DiagramKind::Sequence.name(),
            Self::Activity(_) => DiagramKind::Activity.name(),
            Self::UseCase(_) => DiagramKind::UseCase.name(),
        }
    }
}

/// The loose backend shape. Use cases may be bare names or objects with a
/// `name` field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDiagram {
    #[serde(rename = "type", deserialize_with = "lenient::optional_text")]
    kind: Option<String>,
    #[serde(deserialize_with = "lenient::optional_string")]
    mermaid: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    classes: Vec<ClassBox>,
    #[serde(deserialize_with = "lenient::list")]
    relationships: Vec<Relationship>,
    #[serde(deserialize_with = "lenient::optional_strings")]
    lifelines: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::list")]
    messages: Vec<Message>,
    #[serde(deserialize_with = "lenient::list")]
    nodes: Vec<ActivityNode>,
    #[serde(deserialize_with = "lenient::list")]
    edges: Vec<FlowEdge>,
    #[serde(deserialize_with = "lenient::strings")]
    actors: Vec<String>,
    #[serde(alias = "useCases", deserialize_with = "lenient::strings")]
    use_cases: Vec<String>,
}

impl RawDiagram {
    fn into_spec(self, fallback: DiagramKind) -> DiagramSpec {
        if let Some(source) = self.mermaid.filter(|source| !source.is_empty()) {
            return DiagramSpec::Markup(source);
        }

        let kind = self
            .kind
            .as_deref()
            .map_or(fallback, DiagramKind::parse_lenient);
        trace!(raw_type:? = self.kind, kind:% = kind; "Resolved diagram type");

        match kind {
            DiagramKind::Class => {
                DiagramSpec::Class(ClassDiagram::new(self.classes, self.relationships))
            }
            DiagramKind::Sequence => {
                let lifelines = self.lifelines.unwrap_or(self.actors);
                DiagramSpec::Sequence(SequenceDiagram::new(lifelines, self.messages))
            }
            DiagramKind::Activity => {
                DiagramSpec::Activity(ActivityDiagram::new(self.nodes, self.edges))
            }
            DiagramKind::UseCase => {
                DiagramSpec::UseCase(UseCaseDiagram::new(self.actors, self.use_cases))
            }
        }
    }
}

/// A saved diagram as listed in the diagram history.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiagramRecord {
    #[serde(deserialize_with = "lenient::text")]
    id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    kind: String,
    #[serde(default, deserialize_with = "lenient::text")]
    created_at: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    input_text: Option<String>,
    #[serde(default)]
    diagram_json: serde_json::Value,
}

impl DiagramRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The type the diagram was generated as
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// The prompt the diagram was generated from
    pub fn input_text(&self) -> Option<&str> {
        self.input_text.as_deref()
    }

    /// Text shown for the record in a history list
    pub fn list_label(&self) -> String {
        format!("{} — {}", self.kind, self.created_at)
    }

    /// Decodes the stored payload; the record type is used when the payload
    /// carries none.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Json`] when the payload is not a JSON object.
    pub fn spec(&self) -> Result<DiagramSpec, SextantError> {
        let payload = if self.diagram_json.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            self.diagram_json.clone()
        };
        DiagramSpec::from_value(payload, DiagramKind::parse_lenient(&self.kind))
    }

    /// Decodes a history list.
    ///
    /// # Errors
    ///
    /// Returns [`SextantError::Json`] for malformed input.
    pub fn list_from_json(source: &str) -> Result<Vec<Self>, SextantError> {
        Ok(serde_json::from_str(source)?)
    }
}
