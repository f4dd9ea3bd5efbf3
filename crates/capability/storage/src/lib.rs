//! # CSMS Storage 模块
//!
//! 本模块提供统一的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 该模块采用分层架构，遵循以下原则：
//!
//! 1. **接口抽象层** (`traits.rs`)：持久/临时两个命名空间的键值接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **验证辅助层** (`validation.rs`)：必填/格式/规范化校验
//! 5. **集合层** (`collections/`)：键值之上的类型化集合封装
//! 6. **实现层**：
//!    - `in_memory.rs`：内存存储实现（用于测试和演示）
//!    - `sled_store.rs`：sled 存储实现（打包部署使用）
//!
//! ## 核心特性
//!
//! - **整体读写**：每个集合对应一个 JSON blob，读改写整体完成，无局部更新、无事务
//! - **键名兼容**：持久键名（`users`、`seizureReports` 等）与既有数据逐字段兼容
//! - **显式缺失**：键缺失读作空集合；键存在但损坏显式报 `Serialization` 错误
//! - **类型安全**：记录结构体 + serde camelCase 派生
//! - **可扩展性**：通过 Trait 接口支持多种存储后端
//!
//! ## 并发模型
//!
//! 单写者、单读者、同步完成：每次操作在一次调用内读出、校验、写回。
//! 宿主存在多个执行上下文（多标签页）时为后写覆盖，不做丢失更新检测，
//! 这是记录在案的已接受限制。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use csms_storage::{InMemoryKeyValueStore, UserCollection};
//! use std::sync::Arc;
//!
//! let kv = Arc::new(InMemoryKeyValueStore::new());
//! let users = UserCollection::new(kv);
//! users.ensure_default_admin().await?;
//! let admin = users.find_by_username("admin").await?;
//! ```

pub mod clock;
pub mod collections;
pub mod error;
pub mod in_memory;
pub mod keys;
pub mod models;
pub mod sled_store;
pub mod traits;
pub mod validation;

// 导出常用类型到 crate 根目录，方便外部引用
pub use collections::*;
pub use error::*;
pub use keys::*;
pub use models::*;
pub use traits::*;
pub use validation::*;

// 导出存储实现类型
pub use in_memory::{InMemoryEphemeralStore, InMemoryKeyValueStore};
pub use sled_store::SledKeyValueStore;
