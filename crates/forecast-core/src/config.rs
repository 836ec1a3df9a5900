//! 計劃參數配置

use serde::{Deserialize, Serialize};

use crate::{PlanningError, Result};

/// 請購單類型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    /// 採購
    #[default]
    Purchase,
    /// 調撥
    MaterialTransfer,
    /// 生產領料
    Manufacture,
}

impl RequestType {
    pub fn label(self) -> &'static str {
        match self {
            RequestType::Purchase => "Purchase",
            RequestType::MaterialTransfer => "Material Transfer",
            RequestType::Manufacture => "Manufacture",
        }
    }
}

/// 計劃引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 建立請購單時使用的類型
    pub request_type: RequestType,

    /// 是否檢查週數量與週批數的對應
    /// - true: 某週預測數量 > 0 但該週批數為 0/未填時，拒絕儲存（預設）
    /// - false: 不檢查，僅依批數計算總量
    pub enforce_week_batch_pairing: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            request_type: RequestType::Purchase,
            enforce_week_batch_pairing: true,
        }
    }
}

impl PlannerConfig {
    /// 建構器模式：設置請購單類型
    pub fn with_request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    /// 建構器模式：設置是否檢查週數量與批數對應
    pub fn with_week_batch_pairing(mut self, enforce: bool) -> Self {
        self.enforce_week_batch_pairing = enforce;
        self
    }

    /// 從 JSON 載入配置，未提供的欄位使用預設值
    ///
    /// # 範例
    /// ```
    /// # use forecast_core::{PlannerConfig, RequestType};
    /// let config = PlannerConfig::from_json_str(r#"{ "enforce_week_batch_pairing": false }"#).unwrap();
    /// assert_eq!(config.request_type, RequestType::Purchase);
    /// assert!(!config.enforce_week_batch_pairing);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PlanningError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.request_type, RequestType::Purchase);
        assert!(config.enforce_week_batch_pairing);
    }

    #[test]
    fn test_config_builder() {
        let config = PlannerConfig::default()
            .with_request_type(RequestType::MaterialTransfer)
            .with_week_batch_pairing(false);

        assert_eq!(config.request_type, RequestType::MaterialTransfer);
        assert!(!config.enforce_week_batch_pairing);
    }

    #[rstest]
    #[case("{}", RequestType::Purchase, true)]
    #[case(r#"{ "request_type": "Manufacture" }"#, RequestType::Manufacture, true)]
    #[case(
        r#"{ "request_type": "Purchase", "enforce_week_batch_pairing": false }"#,
        RequestType::Purchase,
        false
    )]
    fn test_load_from_json(
        #[case] json: &str,
        #[case] request_type: RequestType,
        #[case] enforce: bool,
    ) {
        let config = PlannerConfig::from_json_str(json).unwrap();

        assert_eq!(config.request_type, request_type);
        assert_eq!(config.enforce_week_batch_pairing, enforce);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = PlannerConfig::from_json_str(r#"{ "request_type": "Barter" }"#).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidConfig(_)));
    }
}
