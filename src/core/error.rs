use thiserror::Error;

/// Gateway-wide error model for uniform HTTP/JSON mapping.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Message(String),
}

impl From<anyhow::Error> for GatewayError {
    fn from(e: anyhow::Error) -> Self {
        GatewayError::Message(e.to_string())
    }
}

impl From<crate::domain::ToolError> for GatewayError {
    fn from(e: crate::domain::ToolError) -> Self {
        GatewayError::Message(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ToolError;

    #[test]
    fn it_displays_message() {
        let e = GatewayError::Message("boom".into());
        assert_eq!(e.to_string(), "boom");
    }

    #[test]
    fn it_converts_from_anyhow() {
        let any: anyhow::Error = anyhow::anyhow!("nope");
        let gw: GatewayError = any.into();
        assert_eq!(gw.to_string(), "nope");
    }

    #[test]
    fn it_converts_from_tool_error() {
        let gw: GatewayError = ToolError::UnknownTool("pubmed.nope".into()).into();
        assert_eq!(gw.to_string(), "unknown tool: pubmed.nope");
    }
}
