//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to               |
//! |------------|---------------|---------------------------|
//! | `hardware` | InputPort     | ESP32 GPIO (door button)  |
//! |            | ActuatorPort  | Relay + LEDC status LED   |
//! | `log_sink` | EventSink     | Serial log output         |
//! | `notify`   | NotifyPort    | Telegram bot HTTP API     |
//! | `storage`  | SettingsPort  | NVS / in-memory store     |
//! | `time`     | —             | ESP32 system timer        |

pub mod hardware;
pub mod log_sink;
pub mod notify;
pub mod storage;
pub mod time;
