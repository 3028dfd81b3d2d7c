//! SOAP envelopes for the `GetFolder` operation.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::folder::{Folder, WellKnownFolderName};
use crate::version::ExchangeVersion;

/// Builds a `GetFolder` request for one distinguished folder.
pub(crate) fn get_folder_request(version: ExchangeVersion, folder: WellKnownFolderName) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/""#,
            r#" xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types""#,
            r#" xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">"#,
            r#"<soap:Header><t:RequestServerVersion Version="{version}"/></soap:Header>"#,
            r"<soap:Body><m:GetFolder>",
            r"<m:FolderShape><t:BaseShape>Default</t:BaseShape></m:FolderShape>",
            r#"<m:FolderIds><t:DistinguishedFolderId Id="{folder}"/></m:FolderIds>"#,
            r"</m:GetFolder></soap:Body></soap:Envelope>",
        ),
        version = version.as_str(),
        folder = folder.distinguished_id(),
    )
}

#[derive(Debug, Default)]
struct ResponseState {
    response_class: Option<String>,
    response_code: Option<String>,
    message_text: Option<String>,
    fault_code: Option<String>,
    fault_string: Option<String>,
    folder: Folder,
}

impl ResponseState {
    fn attributes(&mut self, element: &BytesStart<'_>) {
        let name = local_name(element);
        for attr in element.attributes().flatten() {
            let Ok(value) = attr.unescape_value() else {
                continue;
            };
            match (name.as_str(), attr.key.local_name().as_ref()) {
                (n, b"ResponseClass") if n.ends_with("ResponseMessage") => {
                    self.response_class = Some(value.into_owned());
                }
                ("FolderId", b"Id") => self.folder.id = value.into_owned(),
                ("FolderId", b"ChangeKey") => self.folder.change_key = Some(value.into_owned()),
                _ => {}
            }
        }
    }

    fn text(&mut self, element: &str, text: String) {
        match element {
            "ResponseCode" => self.response_code = Some(text),
            "MessageText" => self.message_text = Some(text),
            "faultcode" => self.fault_code = Some(text),
            "faultstring" => self.fault_string = Some(text),
            "DisplayName" => self.folder.display_name = Some(text),
            "TotalCount" => self.folder.total_count = text.parse().ok(),
            "UnreadCount" => self.folder.unread_count = text.parse().ok(),
            "ChildFolderCount" => self.folder.child_folder_count = text.parse().ok(),
            _ => {}
        }
    }

    fn finish(self) -> Result<Folder> {
        if let Some(message) = self.fault_string {
            return Err(Error::Soap {
                code: self.fault_code.unwrap_or_else(|| "SoapFault".to_string()),
                message,
            });
        }

        match self.response_class.as_deref() {
            Some("Success" | "Warning") => Ok(self.folder),
            Some(_) => Err(Error::Soap {
                code: self.response_code.unwrap_or_default(),
                message: self
                    .message_text
                    .unwrap_or_else(|| "GetFolder failed".to_string()),
            }),
            None => Err(Error::InvalidResponse(
                "no GetFolderResponseMessage in envelope".to_string(),
            )),
        }
    }
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Parses a `GetFolder` response envelope.
///
/// SOAP faults and error response classes become [`Error::Soap`].
pub(crate) fn parse_get_folder_response(xml: &str) -> Result<Folder> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut state = ResponseState::default();
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                current = local_name(&e);
                state.attributes(&e);
            }
            Event::Empty(e) => state.attributes(&e),
            Event::Text(e) => {
                let text = e.unescape()?.into_owned();
                state.text(&current, text);
            }
            Event::End(_) => current.clear(),
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}
