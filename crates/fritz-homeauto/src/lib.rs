//! Authenticated home-automation queries against a FRITZ!Box gateway.
//!
//! One endpoint, one command: `getdevicelistinfos`, filtered down to
//! the temperature and humidity sensors of a named product. All XML
//! handling is in pure functions so it can be tested without a
//! gateway.

use serde::Serialize;
use thiserror::Error;

use fritz_auth::SessionId;

/// Home-automation query error type.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// XML parse error
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// No device in the list matches the requested product name
    #[error("no device with product name {0:?}")]
    DeviceNotFound(String),

    /// The matched device lacks an expected sensor element
    #[error("device reading missing field: {0}")]
    MissingReading(&'static str),

    /// A sensor value did not parse as a number
    #[error("invalid device reading: {0}")]
    InvalidReading(String),
}

/// Result type alias using DeviceError.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Temperature and humidity reported by one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceReading {
    /// Product name of the device the reading came from.
    pub product: String,
    /// Temperature in degrees Celsius. The gateway reports tenths of
    /// a degree.
    pub temperature_celsius: f64,
    /// Relative humidity in percent.
    pub humidity_percent: u8,
}

/// Client for the gateway's `homeautoswitch.lua` endpoint.
#[derive(Clone)]
pub struct HomeautoClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HomeautoClient {
    /// Create a new home-automation client for a gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the home-automation endpoint URL.
    fn devicelist_url(&self) -> String {
        format!("{}/webservices/homeautoswitch.lua", self.base_url)
    }

    /// Fetch the device list and extract the reading for one product.
    pub async fn fetch_device_reading(
        &self,
        sid: &SessionId,
        product: &str,
    ) -> DeviceResult<DeviceReading> {
        tracing::debug!(product, "querying device list");

        let response = self
            .http_client
            .get(self.devicelist_url())
            .query(&[("switchcmd", "getdevicelistinfos"), ("sid", sid.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;

        parse_device_reading(&body, product)
    }
}

/// Extract the temperature/humidity reading for a product from a
/// `getdevicelistinfos` document.
pub fn parse_device_reading(body: &str, product: &str) -> DeviceResult<DeviceReading> {
    let doc = roxmltree::Document::parse(body)?;

    let device = doc
        .descendants()
        .find(|node| {
            node.has_tag_name("device") && node.attribute("productname") == Some(product)
        })
        .ok_or_else(|| DeviceError::DeviceNotFound(product.to_string()))?;

    let celsius_tenths: i64 = element_text(device, "temperature", "celsius")?
        .parse()
        .map_err(|_| DeviceError::InvalidReading("celsius".to_string()))?;
    let humidity: u8 = element_text(device, "humidity", "rel_humidity")?
        .parse()
        .map_err(|_| DeviceError::InvalidReading("rel_humidity".to_string()))?;

    Ok(DeviceReading {
        product: product.to_string(),
        temperature_celsius: celsius_tenths as f64 / 10.0,
        humidity_percent: humidity,
    })
}

/// Text of `<group><leaf>` under a device node.
fn element_text<'a>(
    device: roxmltree::Node<'a, 'a>,
    group: &'static str,
    leaf: &'static str,
) -> DeviceResult<&'a str> {
    device
        .children()
        .find(|n| n.has_tag_name(group))
        .and_then(|g| g.children().find(|n| n.has_tag_name(leaf)))
        .and_then(|n| n.text())
        .ok_or(DeviceError::MissingReading(leaf))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_LIST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<devicelist version="1">
  <device identifier="11657 0123456" productname="FRITZ!DECT 200">
    <present>1</present>
    <name>Desk socket</name>
    <switch><state>1</state></switch>
  </device>
  <device identifier="13077 0000001" productname="FRITZ!DECT 440">
    <present>1</present>
    <name>Hallway sensor</name>
    <temperature>
      <celsius>215</celsius>
      <offset>0</offset>
    </temperature>
    <humidity>
      <rel_humidity>47</rel_humidity>
    </humidity>
  </device>
</devicelist>"#;

    #[test]
    fn test_parse_reading() {
        let reading = parse_device_reading(DEVICE_LIST, "FRITZ!DECT 440").unwrap();
        assert_eq!(reading.product, "FRITZ!DECT 440");
        assert_eq!(reading.temperature_celsius, 21.5);
        assert_eq!(reading.humidity_percent, 47);
    }

    #[test]
    fn test_parse_negative_temperature() {
        let body = DEVICE_LIST.replace("<celsius>215</celsius>", "<celsius>-32</celsius>");
        let reading = parse_device_reading(&body, "FRITZ!DECT 440").unwrap();
        assert_eq!(reading.temperature_celsius, -3.2);
    }

    #[test]
    fn test_missing_device() {
        assert!(matches!(
            parse_device_reading(DEVICE_LIST, "FRITZ!DECT 500"),
            Err(DeviceError::DeviceNotFound(name)) if name == "FRITZ!DECT 500"
        ));
    }

    #[test]
    fn test_device_without_sensors() {
        // the DECT 200 in the fixture has no temperature element
        assert!(matches!(
            parse_device_reading(DEVICE_LIST, "FRITZ!DECT 200"),
            Err(DeviceError::MissingReading("celsius"))
        ));
    }

    #[test]
    fn test_invalid_reading_value() {
        let body = DEVICE_LIST.replace("<celsius>215</celsius>", "<celsius>warm</celsius>");
        assert!(matches!(
            parse_device_reading(&body, "FRITZ!DECT 440"),
            Err(DeviceError::InvalidReading(_))
        ));
    }

    #[test]
    fn test_devicelist_url() {
        let client = HomeautoClient::new("http://fritz.box/");
        assert_eq!(
            client.devicelist_url(),
            "http://fritz.box/webservices/homeautoswitch.lua"
        );
    }

    #[test]
    fn test_reading_serializes_for_json_output() {
        let reading = DeviceReading {
            product: "FRITZ!DECT 440".to_string(),
            temperature_celsius: 21.5,
            humidity_percent: 47,
        };
        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"temperature_celsius\":21.5"));
        assert!(json.contains("\"humidity_percent\":47"));
    }
}
