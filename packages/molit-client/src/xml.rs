//! XML decoding for the transaction-price API.
//!
//! The envelope is `<response><header><resultCode>…</resultCode></header>
//! <body><items><item>…</item></items></body></response>`. A result code
//! other than `00`/`000` (the service has used both) and any parse failure
//! both yield an empty record set; upstream hiccups must never fail a run.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::PriceRecord;

pub fn parse_price_xml(xml: &str) -> Vec<PriceRecord> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records: Vec<PriceRecord> = Vec::new();
    let mut current: Option<HashMap<String, String>> = None;
    let mut tag_stack: Vec<String> = Vec::new();
    let mut result_code: Option<String> = None;
    let mut result_msg: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                if name == "item" {
                    current = Some(HashMap::new());
                }
                tag_stack.push(name);
            }
            Ok(Event::Text(text)) => {
                let value = match text.unescape() {
                    Ok(v) => v.trim().to_string(),
                    Err(_) => continue,
                };
                let Some(tag) = tag_stack.last() else { continue };
                match tag.as_str() {
                    "resultCode" => result_code = Some(value),
                    "resultMsg" => result_msg = Some(value),
                    "item" => {}
                    _ => {
                        if let Some(fields) = current.as_mut() {
                            fields.insert(tag.clone(), value);
                        }
                    }
                }
            }
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if name == "item" {
                    if let Some(fields) = current.take() {
                        records.push(PriceRecord(fields));
                    }
                }
                tag_stack.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "price XML parse failed");
                return Vec::new();
            }
        }
    }

    if let Some(code) = &result_code {
        if code != "00" && code != "000" {
            tracing::error!(
                code = %code,
                message = result_msg.as_deref().unwrap_or("unknown"),
                "price API returned an error result"
            );
            return Vec::new();
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <header><resultCode>000</resultCode><resultMsg>OK</resultMsg></header>
  <body><items>
    <item>
      <aptNm>목동신시가지1</aptNm>
      <excluUseAr>65.34</excluUseAr>
      <deposit>42,000</deposit>
      <monthlyRent>0</monthlyRent>
    </item>
    <item>
      <aptNm>목동신시가지1</aptNm>
      <excluUseAr>65.34</excluUseAr>
      <deposit>10,000</deposit>
      <monthlyRent>120</monthlyRent>
    </item>
  </items></body>
</response>"#;

    #[test]
    fn parses_items_into_records() {
        let records = parse_price_xml(RENT_XML);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].complex_name(), "목동신시가지1");
        assert_eq!(records[0].deposit(), 42000);
        assert!(records[0].is_pure_jeonse());
        assert!(!records[1].is_pure_jeonse());
    }

    #[test]
    fn error_result_code_yields_empty() {
        let xml = r#"<response><header>
            <resultCode>22</resultCode><resultMsg>LIMITED NUMBER OF SERVICE REQUESTS EXCEEDS</resultMsg>
        </header></response>"#;
        assert!(parse_price_xml(xml).is_empty());
    }

    #[test]
    fn malformed_xml_yields_empty() {
        assert!(parse_price_xml("not xml at all <<<").is_empty());
    }

    #[test]
    fn missing_result_code_still_parses() {
        let xml = "<response><body><items><item><aptNm>A</aptNm></item></items></body></response>";
        assert_eq!(parse_price_xml(xml).len(), 1);
    }
}
