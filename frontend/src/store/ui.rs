//! 界面分区：单个临时通知

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    /// 对应的 daisyUI alert 样式
    pub fn css_class(self) -> &'static str {
        match self {
            NotificationLevel::Success => "alert-success",
            NotificationLevel::Info => "alert-info",
            NotificationLevel::Warning => "alert-warning",
            NotificationLevel::Error => "alert-error",
        }
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub open: bool,
    pub message: String,
    pub level: NotificationLevel,
    /// 每次显示递增，自动隐藏的定时器据此判断通知是否已被替换
    pub serial: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub notification: Notification,
}

impl UiState {
    /// 显示通知，返回其序号
    pub fn show_notification(&mut self, message: impl Into<String>, level: NotificationLevel) -> u64 {
        let serial = self.notification.serial.wrapping_add(1);
        self.notification = Notification {
            open: true,
            message: message.into(),
            level,
            serial,
        };
        serial
    }

    pub fn hide_notification(&mut self) {
        self.notification.open = false;
    }

    /// 仅当仍是同一条通知时隐藏
    pub fn hide_if(&mut self, serial: u64) {
        if self.notification.serial == serial {
            self.hide_notification();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_notification_survives_stale_timer() {
        let mut ui = UiState::default();
        let first = ui.show_notification("Saved", NotificationLevel::Success);
        let second = ui.show_notification("Failed to delete news", NotificationLevel::Error);

        ui.hide_if(first);
        assert!(ui.notification.open);
        assert_eq!(ui.notification.level, NotificationLevel::Error);

        ui.hide_if(second);
        assert!(!ui.notification.open);
        assert_eq!(ui.notification.message, "Failed to delete news");
    }

    #[test]
    fn levels_map_to_styles() {
        assert_eq!(NotificationLevel::Warning.css_class(), "alert-warning");
        assert_eq!(NotificationLevel::Error.to_string(), "error");
    }
}
