use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ReservationError;
use crate::types::{Reservation, DEFAULT_RESERVATION_STATUS};

/// Parse a reservation response body.
///
/// JSON bodies must carry `ride_id`. Anything that is not JSON goes through
/// [`extract_ride_id_heuristic`].
pub fn parse_reservation(body: &[u8], station_id: &str) -> Result<Reservation, ReservationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => reservation_from_json(&value, station_id),
        Err(err) => {
            tracing::warn!(
                error = %err,
                bytes = body.len(),
                "reservation response is not JSON, using heuristic ride id extraction"
            );
            let ride_id = extract_ride_id_heuristic(body).ok_or_else(|| {
                ReservationError::Unparseable("no ride id found in non-JSON response".to_string())
            })?;
            Ok(Reservation {
                ride_id,
                status: DEFAULT_RESERVATION_STATUS.to_string(),
                station_id: station_id.to_string(),
            })
        }
    }
}

fn reservation_from_json(value: &Value, station_id: &str) -> Result<Reservation, ReservationError> {
    let object = value.as_object().ok_or_else(|| {
        ReservationError::Unparseable("expected a JSON object".to_string())
    })?;
    let ride_id = match object.get("ride_id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(ReservationError::Unparseable(
                "response has no ride_id".to_string(),
            ))
        }
    };
    let status = object
        .get("status")
        .and_then(Value::as_str)
        .filter(|status| !status.is_empty())
        .unwrap_or(DEFAULT_RESERVATION_STATUS);
    Ok(Reservation {
        ride_id,
        status: status.to_string(),
        station_id: station_id.to_string(),
    })
}

/// Best-effort ride id lookup in a non-JSON (likely protobuf) body.
///
/// Unstable by nature: the body is decoded as UTF-8 with invalid sequences
/// dropped, and the first standalone run of 15 to 20 digits is taken as the
/// ride id. When several runs qualify the first one wins; nothing checks
/// that it is the ride id field.
pub fn extract_ride_id_heuristic(body: &[u8]) -> Option<String> {
    static RIDE_ID: OnceLock<Regex> = OnceLock::new();
    let pattern = RIDE_ID.get_or_init(|| Regex::new(r"\b([0-9]{15,20})\b").expect("valid regex"));
    let text: String = String::from_utf8_lossy(body)
        .chars()
        .filter(|ch| *ch != char::REPLACEMENT_CHARACTER)
        .collect();
    pattern
        .captures(&text)
        .map(|captures| captures[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_body_uses_ride_id_and_status() {
        let body = br#"{"ride_id": "123456789012345", "status": "reserved"}"#;
        let reservation = parse_reservation(body, "station-1").unwrap();
        assert_eq!(
            reservation,
            Reservation {
                ride_id: "123456789012345".to_string(),
                status: "reserved".to_string(),
                station_id: "station-1".to_string(),
            }
        );
    }

    #[test]
    fn json_status_defaults_to_reserved() {
        let reservation = parse_reservation(br#"{"ride_id": 987654321012345678}"#, "s").unwrap();
        assert_eq!(reservation.ride_id, "987654321012345678");
        assert_eq!(reservation.status, DEFAULT_RESERVATION_STATUS);
    }

    #[test]
    fn json_without_ride_id_does_not_fall_back() {
        let body = br#"{"message": "ride 123456789012345678"}"#;
        let err = parse_reservation(body, "s").unwrap_err();
        assert!(matches!(err, ReservationError::Unparseable(_)));
    }

    #[test]
    fn json_scalar_is_rejected() {
        let err = parse_reservation(b"123456789012345678", "s").unwrap_err();
        assert!(matches!(err, ReservationError::Unparseable(_)));
    }

    #[test]
    fn heuristic_extracts_digit_run_from_text() {
        let reservation = parse_reservation(b"...ride=98765432109876543...", "s").unwrap();
        assert_eq!(reservation.ride_id, "98765432109876543");
        assert_eq!(reservation.status, DEFAULT_RESERVATION_STATUS);
        assert_eq!(reservation.station_id, "s");
    }

    #[test]
    fn heuristic_handles_protobuf_like_bytes() {
        let mut body = vec![0x0a, 0x12];
        body.extend_from_slice(b"112233445566778899");
        body.extend_from_slice(&[0x12, 0x08]);
        body.extend_from_slice(b"reserved");
        body.extend_from_slice(&[0xff, 0xfe, 0x00]);
        assert_eq!(
            extract_ride_id_heuristic(&body).as_deref(),
            Some("112233445566778899")
        );
    }

    #[test]
    fn heuristic_drops_invalid_utf8_inside_a_run() {
        let body = b"id:12345678\xff9012345678;";
        assert_eq!(
            extract_ride_id_heuristic(body).as_deref(),
            Some("123456789012345678")
        );
    }

    #[test]
    fn heuristic_takes_first_candidate() {
        let body = b"a 111111111111111 b 222222222222222222 c";
        assert_eq!(
            extract_ride_id_heuristic(body).as_deref(),
            Some("111111111111111")
        );
    }

    #[test]
    fn heuristic_ignores_short_and_overlong_runs() {
        assert_eq!(extract_ride_id_heuristic(b"code 12345678901234 end"), None);
        assert_eq!(
            extract_ride_id_heuristic(b"x 123456789012345678901 y"),
            None
        );
    }

    #[test]
    fn no_json_and_no_digits_fails() {
        let err = parse_reservation(b"\x08\x01\x12\x04oops", "s").unwrap_err();
        assert!(matches!(err, ReservationError::Unparseable(_)));
        assert!(err.to_string().starts_with("Could not parse reservation response"));
    }

    #[test]
    fn empty_body_fails() {
        assert!(parse_reservation(b"", "s").is_err());
    }
}
