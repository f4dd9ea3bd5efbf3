//! 设备能力接口：相机、定位、逆地理编码的提供者抽象。
//!
//! 源实现在运行时用 `typeof` 探测全局函数来区分 Cordova/Web 能力；
//! 这里改为启动时显式选择提供者实现。真正的 Web/Cordova 实现位于
//! 宿主外壳（外部协作方），本 crate 只定义接口与 Disabled 占位实现。

use async_trait::async_trait;
use std::sync::Arc;

/// 设备能力错误。
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// 当前宿主没有该能力（Disabled 实现或用户拒绝授权）。
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("capture failed: {0}")]
    Capture(String),
}

/// 定位结果（核心层按原样落到报告的 coordinates 字段）。
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFix {
    pub lat: f64,
    pub lng: f64,
    pub accuracy: Option<f64>,
}

/// 相机提供者：产出 base64 data URI 形式的照片。
#[async_trait]
pub trait CameraProvider: Send + Sync {
    async fn capture_photo(&self) -> Result<String, DeviceError>;
}

/// 定位提供者。
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<GeoFix, DeviceError>;
}

/// 逆地理编码提供者：失败时静默（调用方回落到手工输入地点）。
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn address_for(&self, lat: f64, lng: f64) -> Option<String>;
}

/// 无能力占位实现。
#[derive(Debug, Default)]
pub struct Disabled;

#[async_trait]
impl CameraProvider for Disabled {
    async fn capture_photo(&self) -> Result<String, DeviceError> {
        Err(DeviceError::Unavailable("camera".to_string()))
    }
}

#[async_trait]
impl GeolocationProvider for Disabled {
    async fn current_position(&self) -> Result<GeoFix, DeviceError> {
        Err(DeviceError::Unavailable("geolocation".to_string()))
    }
}

#[async_trait]
impl ReverseGeocoder for Disabled {
    async fn address_for(&self, _lat: f64, _lng: f64) -> Option<String> {
        None
    }
}

/// 启动时装配好的能力集合。
#[derive(Clone)]
pub struct DeviceCapabilities {
    pub camera: Arc<dyn CameraProvider>,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
}

impl DeviceCapabilities {
    pub fn new(
        camera: Arc<dyn CameraProvider>,
        geolocation: Arc<dyn GeolocationProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
    ) -> Self {
        Self {
            camera,
            geolocation,
            geocoder,
        }
    }

    /// 全部能力关闭（无相机/定位环境与测试用）。
    pub fn disabled() -> Self {
        Self {
            camera: Arc::new(Disabled),
            geolocation: Arc::new(Disabled),
            geocoder: Arc::new(Disabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_capabilities_report_unavailable() {
        let capabilities = DeviceCapabilities::disabled();
        let err = capabilities
            .camera
            .capture_photo()
            .await
            .expect_err("no camera");
        assert!(matches!(err, DeviceError::Unavailable(_)));

        let err = capabilities
            .geolocation
            .current_position()
            .await
            .expect_err("no geolocation");
        assert!(matches!(err, DeviceError::Unavailable(_)));

        assert!(capabilities.geocoder.address_for(12.97, 77.59).await.is_none());
    }
}
