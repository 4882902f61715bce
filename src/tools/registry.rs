//! Tool declarations and the startup-validated registry

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use super::ToolKind;
use crate::error::{Result, VariantAiError};
use crate::llm::ToolDefinition;

/// JSON type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl ParameterSpec {
    /// Required string parameter
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: ParamType::String,
            description: description.into(),
            required: true,
        }
    }
}

/// A callable tool as presented to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDeclaration {
    pub kind: ToolKind,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl ToolDeclaration {
    /// Built-in declaration for a tool kind
    pub fn for_kind(kind: ToolKind) -> Self {
        let (description, parameter) = match kind {
            ToolKind::ConsequenceInfo => (
                "Get variant consequence information associated with a specific variant.",
                ParameterSpec::required_string("variant_id", "Variant identifier, e.g. 'chr1:g.11856378G>A'"),
            ),
            ToolKind::GeneName => (
                "Get gene name associated with a specific variant.",
                ParameterSpec::required_string("variant_id", "Variant identifier, e.g. 'chr1:g.11856378G>A'"),
            ),
            ToolKind::Literature => (
                "Search Google scholar for variant-related publications",
                ParameterSpec::required_string(
                    "query",
                    "Searching for literature, scientific papers and research for variant-related publications",
                ),
            ),
            ToolKind::ClinicalInfo => (
                "Gets clinical significance information from various sources about one specific variant in accordance to HGVS standards",
                ParameterSpec::required_string("variant_id", "Variant HGVS identifier, e.g. 'chr9:g.107620835G>A'"),
            ),
        };

        Self {
            kind,
            name: kind.name().to_string(),
            description: description.to_string(),
            parameters: vec![parameter],
        }
    }

    /// JSON schema of the parameter object
    pub fn parameters_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.param_type.as_str(), "description": p.description }),
                )
            })
            .collect();

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Convert to LLM ToolDefinition for API calls
    pub fn to_llm_definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name.clone(), self.description.clone(), self.parameters_schema())
    }

    /// Check a raw argument payload against the declared parameters
    ///
    /// Required parameters must be present and non-null; every declared
    /// parameter that is present must have its declared type. Undeclared keys
    /// are ignored.
    pub fn validate_arguments(&self, arguments: &Value) -> Result<()> {
        let invalid = |reason: String| VariantAiError::InvalidArguments {
            tool: self.name.clone(),
            reason,
        };

        let Some(object) = arguments.as_object() else {
            return Err(invalid(format!("expected a JSON object, got {}", arguments)));
        };

        for param in &self.parameters {
            match object.get(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(invalid(format!("missing required parameter '{}'", param.name)));
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.param_type.accepts(value) => {
                    return Err(invalid(format!(
                        "parameter '{}' must be a {}",
                        param.name,
                        param.param_type.as_str()
                    )));
                }
                Some(Value::String(s)) if param.required && s.trim().is_empty() => {
                    return Err(invalid(format!("parameter '{}' must not be empty", param.name)));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Ordered, immutable set of tool declarations
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    declarations: Vec<ToolDeclaration>,
}

impl ToolRegistry {
    /// The built-in tool set, in declaration order
    pub fn standard() -> Result<Self> {
        Self::from_declarations(ToolKind::ALL.into_iter().map(ToolDeclaration::for_kind).collect())
    }

    /// Validate and freeze a declaration list
    pub fn from_declarations(declarations: Vec<ToolDeclaration>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut kinds = HashSet::new();

        for decl in &declarations {
            if decl.name.trim().is_empty() {
                return Err(VariantAiError::Registry("tool with empty name".to_string()));
            }
            if !names.insert(decl.name.as_str()) {
                return Err(VariantAiError::Registry(format!("duplicate tool name: {}", decl.name)));
            }
            if decl.description.trim().is_empty() {
                return Err(VariantAiError::Registry(format!("tool {} has no description", decl.name)));
            }
            if ToolKind::from_name(&decl.name) != Some(decl.kind) {
                return Err(VariantAiError::Registry(format!(
                    "tool {} is not bound to the {} executor",
                    decl.name, decl.kind
                )));
            }
            if !kinds.insert(decl.kind) {
                return Err(VariantAiError::Registry(format!(
                    "executor {} declared more than once",
                    decl.kind
                )));
            }

            let mut params = HashSet::new();
            for param in &decl.parameters {
                if param.name.trim().is_empty() || param.description.trim().is_empty() {
                    return Err(VariantAiError::Registry(format!(
                        "tool {} has a parameter without name or description",
                        decl.name
                    )));
                }
                if !params.insert(param.name.as_str()) {
                    return Err(VariantAiError::Registry(format!(
                        "tool {} declares parameter {} twice",
                        decl.name, param.name
                    )));
                }
            }
        }

        if let Some(missing) = ToolKind::ALL.into_iter().find(|kind| !kinds.contains(kind)) {
            return Err(VariantAiError::Registry(format!("no declaration for executor {}", missing)));
        }

        Ok(Self { declarations })
    }

    /// Look up a declaration by wire name
    pub fn get(&self, name: &str) -> Option<&ToolDeclaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    pub fn names(&self) -> Vec<&str> {
        self.declarations.iter().map(|d| d.name.as_str()).collect()
    }

    /// Tool definitions attached to the first model request
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.declarations.iter().map(|d| d.to_llm_definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_declarations() -> Vec<ToolDeclaration> {
        ToolKind::ALL.into_iter().map(ToolDeclaration::for_kind).collect()
    }

    #[test]
    fn test_standard_registry_order() {
        let registry = ToolRegistry::standard().unwrap();
        assert_eq!(
            registry.names(),
            vec!["get_consequence_info", "get_gene_name", "show_literature", "get_clinical_info"]
        );
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_standard_registry_definitions() {
        let registry = ToolRegistry::standard().unwrap();
        let defs = registry.definitions();

        let clinical = defs.iter().find(|d| d.name == "get_clinical_info").unwrap();
        assert_eq!(clinical.parameters["type"], "object");
        assert_eq!(clinical.parameters["properties"]["variant_id"]["type"], "string");
        assert_eq!(clinical.parameters["required"][0], "variant_id");

        let literature = defs.iter().find(|d| d.name == "show_literature").unwrap();
        assert_eq!(literature.parameters["required"][0], "query");
    }

    #[test]
    fn test_get_by_name() {
        let registry = ToolRegistry::standard().unwrap();
        assert_eq!(registry.get("get_gene_name").unwrap().kind, ToolKind::GeneName);
        assert!(registry.get("get_weather").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut decls = standard_declarations();
        decls.push(ToolDeclaration::for_kind(ToolKind::GeneName));
        let err = ToolRegistry::from_declarations(decls).unwrap_err();
        assert!(err.to_string().contains("duplicate tool name: get_gene_name"));
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut decls = standard_declarations();
        decls[0].description = "  ".to_string();
        assert!(matches!(
            ToolRegistry::from_declarations(decls),
            Err(VariantAiError::Registry(_))
        ));
    }

    #[test]
    fn test_parameter_without_description_rejected() {
        let mut decls = standard_declarations();
        decls[1].parameters[0].description = String::new();
        assert!(ToolRegistry::from_declarations(decls).is_err());
    }

    #[test]
    fn test_missing_executor_declaration_rejected() {
        let mut decls = standard_declarations();
        decls.pop();
        let err = ToolRegistry::from_declarations(decls).unwrap_err();
        assert!(err.to_string().contains("get_clinical_info"));
    }

    #[test]
    fn test_name_bound_to_wrong_executor_rejected() {
        let mut decls = standard_declarations();
        decls[0].name = "lookup_consequence".to_string();
        let err = ToolRegistry::from_declarations(decls).unwrap_err();
        assert!(err.to_string().contains("not bound"));
    }

    #[test]
    fn test_validate_arguments_ok() {
        let decl = ToolDeclaration::for_kind(ToolKind::ClinicalInfo);
        assert!(decl.validate_arguments(&json!({"variant_id": "chr9:g.107620835G>A"})).is_ok());
        assert!(
            decl.validate_arguments(&json!({"variant_id": "chr9:g.107620835G>A", "extra": 1}))
                .is_ok()
        );
    }

    #[test]
    fn test_validate_arguments_missing_required() {
        let decl = ToolDeclaration::for_kind(ToolKind::ClinicalInfo);
        let err = decl.validate_arguments(&json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments for get_clinical_info: missing required parameter 'variant_id'"
        );

        let err = decl.validate_arguments(&json!({"variant_id": null})).unwrap_err();
        assert!(err.to_string().contains("missing required parameter"));
    }

    #[test]
    fn test_validate_arguments_wrong_type() {
        let decl = ToolDeclaration::for_kind(ToolKind::Literature);
        let err = decl.validate_arguments(&json!({"query": 42})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid arguments for show_literature: parameter 'query' must be a string"
        );
    }

    #[test]
    fn test_validate_arguments_blank_string() {
        let decl = ToolDeclaration::for_kind(ToolKind::GeneName);
        let err = decl.validate_arguments(&json!({"variant_id": "   "})).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validate_arguments_not_an_object() {
        let decl = ToolDeclaration::for_kind(ToolKind::GeneName);
        let err = decl.validate_arguments(&Value::String("{broken".to_string())).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Integer.accepts(&json!(5)));
        assert!(!ParamType::Integer.accepts(&json!("5")));
        assert!(ParamType::Boolean.accepts(&json!(true)));
    }
}
