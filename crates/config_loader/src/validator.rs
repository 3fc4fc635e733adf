//! 配置校验模块
//!
//! 校验规则：
//! - accessToken / apiVersion / pixelId 必填且非空
//! - graphBaseUrl 如设置，必须为 http(s) URL
//! - 启用 debug 时 testCode 必填且非空

use contracts::{ContractError, DebugMode};
use tracing::warn;
use validator::Validate;

use crate::document::{ConfigDocument, DebugValue, ModuleConf};

/// 必填字段，按报告顺序
const REQUIRED_FIELDS: [&str; 3] = ["accessToken", "apiVersion", "pixelId"];

/// 由 derive 校验的字段，按报告顺序
const VALIDATED_FIELDS: [&str; 4] = ["access_token", "api_version", "pixel_id", "graph_base_url"];

/// 校验已解析的配置文档
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(doc: &ConfigDocument) -> Result<(), ContractError> {
    let conf = &doc.module_conf;
    validate_required(conf)?;
    validate_fields(conf)?;
    validate_base_url(conf)?;
    validate_test_code(conf)?;
    Ok(())
}

/// 将 `debug` 值映射为调试模式
///
/// 除 `"payload"` 与 `"request"` 以外的值均关闭调试。
pub fn resolve_debug_mode(value: &DebugValue) -> DebugMode {
    match value {
        DebugValue::Flag(false) => DebugMode::Off,
        DebugValue::Flag(true) => {
            warn!("debug = true is not a debug mode, expected \"payload\" or \"request\"; debugging disabled");
            DebugMode::Off
        }
        DebugValue::Mode(mode) => DebugMode::from_config_value(mode).unwrap_or_else(|| {
            warn!(debug = %mode, "unknown debug mode; debugging disabled");
            DebugMode::Off
        }),
    }
}

fn validate_required(conf: &ModuleConf) -> Result<(), ContractError> {
    let values = [&conf.access_token, &conf.api_version, &conf.pixel_id];
    for (key, value) in REQUIRED_FIELDS.iter().zip(values) {
        if value.is_none() {
            return Err(ContractError::config_validation(
                format!("moduleConf.{key}"),
                "missing configuration parameter",
            ));
        }
    }
    Ok(())
}

fn validate_fields(conf: &ModuleConf) -> Result<(), ContractError> {
    let Err(errors) = conf.validate() else {
        return Ok(());
    };
    let field_errors = errors.field_errors();

    for field in VALIDATED_FIELDS {
        if let Some(first) = field_errors.get(field).and_then(|errs| errs.first()) {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            return Err(ContractError::config_validation(config_key(field), message));
        }
    }

    Err(ContractError::config_validation("moduleConf", errors.to_string()))
}

fn validate_base_url(conf: &ModuleConf) -> Result<(), ContractError> {
    if let Some(url) = &conf.graph_base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ContractError::config_validation(
                "moduleConf.graphBaseUrl",
                format!("must start with http:// or https://, got '{url}'"),
            ));
        }
    }
    Ok(())
}

fn validate_test_code(conf: &ModuleConf) -> Result<(), ContractError> {
    let mode = resolve_debug_mode(&conf.debug);
    if !mode.is_enabled() {
        return Ok(());
    }
    match conf.test_code.as_deref() {
        Some(code) if !code.is_empty() => Ok(()),
        _ => Err(ContractError::config_validation(
            "moduleConf.testCode",
            format!("testCode is required when debug = \"{mode}\""),
        )),
    }
}

/// `access_token` -> `moduleConf.accessToken`
fn config_key(field: &str) -> String {
    let mut key = String::from("moduleConf.");
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_doc() -> ConfigDocument {
        ConfigDocument {
            module_conf: ModuleConf {
                access_token: Some("TOKEN".into()),
                api_version: Some("v18.0".into()),
                pixel_id: Some("123".into()),
                debug: DebugValue::Flag(false),
                test_code: None,
                graph_base_url: None,
            },
        }
    }

    fn field_of(err: ContractError) -> String {
        match err {
            ContractError::ConfigValidation { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_doc()).is_ok());
    }

    #[test]
    fn test_missing_pixel_id() {
        let mut doc = minimal_doc();
        doc.module_conf.pixel_id = None;
        let err = validate(&doc).unwrap_err();
        assert_eq!(field_of(err), "moduleConf.pixelId");
    }

    #[test]
    fn test_empty_access_token() {
        let mut doc = minimal_doc();
        doc.module_conf.access_token = Some(String::new());
        let err = validate(&doc).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert_eq!(field_of(err), "moduleConf.accessToken");
    }

    #[test]
    fn test_debug_requires_test_code() {
        let mut doc = minimal_doc();
        doc.module_conf.debug = DebugValue::Mode("payload".into());
        let err = validate(&doc).unwrap_err();
        assert_eq!(field_of(err), "moduleConf.testCode");

        doc.module_conf.test_code = Some(String::new());
        assert!(validate(&doc).is_err());

        doc.module_conf.test_code = Some("TEST1".into());
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn test_unknown_debug_mode_needs_no_test_code() {
        let mut doc = minimal_doc();
        doc.module_conf.debug = DebugValue::Mode("verbose".into());
        assert!(validate(&doc).is_ok());
        assert_eq!(resolve_debug_mode(&doc.module_conf.debug), DebugMode::Off);
    }

    #[test]
    fn test_resolve_debug_mode() {
        assert_eq!(resolve_debug_mode(&DebugValue::Flag(false)), DebugMode::Off);
        assert_eq!(resolve_debug_mode(&DebugValue::Flag(true)), DebugMode::Off);
        assert_eq!(
            resolve_debug_mode(&DebugValue::Mode("payload".into())),
            DebugMode::Payload
        );
        assert_eq!(
            resolve_debug_mode(&DebugValue::Mode("request".into())),
            DebugMode::Request
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut doc = minimal_doc();
        doc.module_conf.graph_base_url = Some("ftp://graph.example".into());
        let err = validate(&doc).unwrap_err();
        assert_eq!(field_of(err), "moduleConf.graphBaseUrl");

        doc.module_conf.graph_base_url = Some("not a url".into());
        assert!(validate(&doc).is_err());

        doc.module_conf.graph_base_url = Some("http://127.0.0.1:9000".into());
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn test_config_key() {
        assert_eq!(config_key("access_token"), "moduleConf.accessToken");
        assert_eq!(config_key("graph_base_url"), "moduleConf.graphBaseUrl");
    }
}
