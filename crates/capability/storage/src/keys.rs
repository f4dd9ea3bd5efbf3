//! 键空间常量
//!
//! 持久命名空间与临时（标签页作用域）命名空间中的既有键名。
//! 为兼容已部署的数据，键名不可更改。

/// 用户集合。
pub const KEY_USERS: &str = "users";
/// 当前会话用户（完整用户记录）。
pub const KEY_CURRENT_USER: &str = "currentUser";
/// 扣押报告集合。
pub const KEY_SEIZURE_REPORTS: &str = "seizureReports";
/// 车辆缴费记录（按车牌号分组的映射）。
pub const KEY_VEHICLE_PAYMENTS: &str = "vehiclePayments";
/// 审计日志（FIFO 截断至最近 1000 条）。
pub const KEY_AUDIT_LOG: &str = "auditLog";
/// 系统配置单例。
pub const KEY_SYSTEM_CONFIG: &str = "systemConfig";
/// “记住我”保存的登录标识。
pub const KEY_REMEMBERED_USER: &str = "rememberedUser";

/// 登录 OTP（临时存储）。
pub const KEY_CURRENT_OTP: &str = "currentOTP";
/// 注册 OTP（临时存储）。
pub const KEY_SIGNUP_OTP: &str = "signupOTP";
/// 注册待建档资料（临时存储）。
pub const KEY_SIGNUP_DATA: &str = "signupData";
