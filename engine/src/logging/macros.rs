/// Convenience macro for scoped logging at different levels
#[macro_export]
macro_rules! scoped_log {
    ($level:ident, $scope:expr, $($arg:tt)*) => {
        let log_config = $crate::logging::get_log_config();
        if log_config.should_log($scope, $crate::logging::Level::$level) {
            tracing::event!($crate::logging::Level::$level, scope = $scope, $($arg)*);
        }
    };
}

// Convenience macros for common scopes
#[macro_export]
macro_rules! locomotion_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "locomotion", $($arg)*);
    };
}

#[macro_export]
macro_rules! input_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "input", $($arg)*);
    };
}

#[macro_export]
macro_rules! guide_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "guide", $($arg)*);
    };
}

#[macro_export]
macro_rules! physics_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "physics", $($arg)*);
    };
}

#[macro_export]
macro_rules! scene_log {
    ($level:ident, $($arg:tt)*) => {
        $crate::scoped_log!($level, "scene", $($arg)*);
    };
}
