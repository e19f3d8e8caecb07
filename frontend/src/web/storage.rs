//! 本地存储封装模块
//!
//! `KeyValueStorage` 抽象出字符串键值存储，浏览器中直接使用 `web_sys::Storage`
//! 读写原始字符串（不经过 JSON 编码），测试与非浏览器环境使用 `MemoryStorage`。

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// 字符串键值存储
pub trait KeyValueStorage: Send + Sync {
    /// 键不存在或读取失败时返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 返回写入是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 返回删除是否成功
    fn remove(&self, key: &str) -> bool;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> bool {
        (**self).remove(key)
    }
}

// =========================================================
// 浏览器实现
// =========================================================

/// 浏览器 LocalStorage
///
/// 值按原样保存，令牌在存储中就是裸的 bearer 字符串。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例（被禁用或不在浏览器中时为 `None`）
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let written = Self::storage().is_some_and(|s| s.set_item(key, value).is_ok());
        if !written {
            tracing::warn!(key, "localStorage write failed");
        }
        written
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage().is_some_and(|s| s.remove_item(key).is_ok())
    }
}

// =========================================================
// 内存实现
// =========================================================

/// 进程内存储，页面刷新即丢失
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.set(key, value);
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token"), None);
        assert!(storage.set("token", "abc"));
        assert_eq!(storage.get("token").as_deref(), Some("abc"));
        assert!(storage.remove("token"));
        assert_eq!(storage.get("token"), None);
    }
}
