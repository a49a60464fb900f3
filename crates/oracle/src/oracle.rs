use crate::error::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One structured-generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OracleRequest {
    /// Free-form prompt text
    pub prompt: String,

    /// Name reported for the response schema
    pub schema_name: String,

    /// JSON schema the response must conform to
    pub schema: serde_json::Value,
}

impl OracleRequest {
    /// Build a request whose schema is derived from `T`
    pub fn for_response<T: JsonSchema>(prompt: impl Into<String>) -> Result<Self> {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        Ok(Self {
            prompt: prompt.into(),
            schema_name: "response_schema".to_string(),
            schema,
        })
    }
}

/// The external generation oracle
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Run one request and return the raw JSON content of the response
    async fn complete(&self, request: &OracleRequest) -> Result<String>;
}

/// Ask the oracle once and decode the response into `T`
pub async fn request_structured<T>(oracle: &dyn Oracle, prompt: impl Into<String>) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let request = OracleRequest::for_response::<T>(prompt)?;
    let content = oracle.complete(&request).await?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OracleError, ScriptedOracle};

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(deny_unknown_fields)]
    struct Queries {
        #[allow(dead_code)]
        queries: Vec<String>,
    }

    #[test]
    fn schema_is_strict_object() {
        let request = OracleRequest::for_response::<Queries>("prompt").unwrap();
        assert_eq!(request.schema["type"], "object");
        assert_eq!(request.schema["additionalProperties"], false);
        assert_eq!(request.schema["required"][0], "queries");
    }

    #[tokio::test]
    async fn decode_failure_is_reported() {
        let oracle = ScriptedOracle::new();
        oracle.push_raw("{\"queries\": 3}");
        let err = request_structured::<Queries>(&oracle, "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, OracleError::Decode(_)), "{err}");
    }
}
