//! Telegram notification adapter.
//!
//! Implements [`NotifyPort`] by firing a `sendMessage` call at the
//! Telegram bot API over HTTPS.  Delivery is strictly best-effort: the
//! caller logs failures and moves on, the door never waits on the network.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw `esp_http_client` sys calls with the bundled CA store.
//! On host/test: the message is logged instead of sent.

use log::info;

use crate::app::events::OpenTrigger;
use crate::app::ports::{NotifyError, NotifyPort};

#[cfg(target_os = "espidf")]
use log::warn;

pub struct TelegramNotifier {
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// `token` is the bot token from @BotFather, `chat_id` the target chat.
    /// Empty strings leave the notifier unconfigured; `notify` then returns
    /// [`NotifyError::NotConfigured`].
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            token: token.to_owned(),
            chat_id: chat_id.to_owned(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.token.is_empty() && !self.chat_id.is_empty()
    }

    fn message_for(trigger: OpenTrigger) -> &'static str {
        match trigger {
            OpenTrigger::Sequence => "Yo! Someone just opened the door with the secret code.",
            OpenTrigger::Command => "Yo! Someone just opened the door with the web command.",
        }
    }

    fn build_url(&self, text: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/sendMessage?chat_id={}&text={}",
            self.token,
            self.chat_id,
            percent_encode(text)
        )
    }

    #[cfg(target_os = "espidf")]
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        use esp_idf_svc::sys::*;

        let url = std::ffi::CString::new(self.build_url(text))
            .map_err(|_| NotifyError::SendFailed)?;

        // SAFETY: config and URL outlive the client; init/perform/cleanup
        // are called in order from the single main-task context.
        unsafe {
            let cfg = esp_http_client_config_t {
                url: url.as_ptr(),
                method: esp_http_client_method_t_HTTP_METHOD_GET,
                crt_bundle_attach: Some(esp_crt_bundle_attach),
                timeout_ms: 5_000,
                ..Default::default()
            };
            let client = esp_http_client_init(&cfg);
            if client.is_null() {
                return Err(NotifyError::SendFailed);
            }
            let ret = esp_http_client_perform(client);
            let status = esp_http_client_get_status_code(client);
            esp_http_client_cleanup(client);

            if ret != ESP_OK || status != 200 {
                warn!("TelegramNotifier: send failed (rc={}, status={})", ret, status);
                return Err(NotifyError::SendFailed);
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!("TelegramNotifier(sim): would send '{}'", text);
        Ok(())
    }
}

impl NotifyPort for TelegramNotifier {
    fn notify(&mut self, trigger: OpenTrigger) -> Result<(), NotifyError> {
        if !self.is_configured() {
            return Err(NotifyError::NotConfigured);
        }
        self.send(Self::message_for(trigger))
    }
}

/// Minimal percent-encoding for the `text` query parameter.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}
