//! JavaScript execution operations for CDP page session.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate a JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            return Err(CdpError::JavaScript(exception_message(exception)));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Evaluate and deserialize the returned value.
    pub async fn evaluate_as<T: DeserializeOwned>(&self, expression: &str) -> Result<T, CdpError> {
        let value = self.evaluate(expression).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Expose `window.<name>(payload)` to page scripts; each call arrives as
    /// a `Runtime.bindingCalled` event.
    pub async fn add_binding(&self, name: &str) -> Result<(), CdpError> {
        self.call("Runtime.addBinding", Some(json!({"name": name})))
            .await?;
        Ok(())
    }

    /// Run `source` in every document this page loads from now on.
    pub async fn add_init_script(&self, source: &str) -> Result<(), CdpError> {
        self.call(
            "Page.addScriptToEvaluateOnNewDocument",
            Some(json!({"source": source})),
        )
        .await?;
        Ok(())
    }
}

pub(super) fn exception_message(exception: &Value) -> String {
    exception["exception"]["description"]
        .as_str()
        .or_else(|| exception["text"].as_str())
        .unwrap_or("Unknown error")
        .to_string()
}
