//! # 错误处理宏

/// 构造带格式化消息的 `ProxyError` 变体（仅适用于 `{ message, source }` 形式的变体）
#[macro_export]
macro_rules! error {
    ($variant:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::error::ProxyError::$variant {
            message: format!($fmt $(, $arg)*),
            source: None,
        }
    };
    ($variant:ident, $msg:expr $(,)?) => {
        $crate::error::ProxyError::$variant {
            message: ::std::string::ToString::to_string(&$msg),
            source: None,
        }
    };
}

/// 立即返回错误
#[macro_export]
macro_rules! bail {
    ($variant:ident, $($arg:tt)+) => {
        return Err($crate::error!($variant, $($arg)+))
    };
}

/// 确保条件成立，否则返回指定变体的错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident, $($arg:tt)+) => {
        if !($cond) {
            $crate::bail!($variant, $($arg)+);
        }
    };
}
