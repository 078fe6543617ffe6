// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Log a formatted message with a raw severity index through the default logger.
///
/// # Examples
///
/// ```no_run
/// dailylog::emit!(5, "user {} logged in", "alice");
/// dailylog::emit!(99, "index out of range gives an empty tag");
/// ```
#[macro_export]
macro_rules! emit {
    ($severity:expr, $($arg:tt)+) => {
        $crate::emit($severity, ::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `EMER` through the default logger.
#[macro_export]
macro_rules! emer {
    ($($arg:tt)+) => {
        $crate::emer(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `ALRT` through the default logger.
#[macro_export]
macro_rules! alert {
    ($($arg:tt)+) => {
        $crate::alert(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `CRIT` through the default logger.
#[macro_export]
macro_rules! crit {
    ($($arg:tt)+) => {
        $crate::crit(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `EROR` through the default logger.
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::error(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `WARN` through the default logger.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warn(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `INFO` through the default logger.
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::info(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `DEBG` through the default logger.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::debug(::std::format_args!($($arg)+))
    };
}

/// Log a formatted message tagged `TRAC` through the default logger.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)+) => {
        $crate::trace(::std::format_args!($($arg)+))
    };
}
