//! Verify-on-connect against a stub EWS endpoint.
//!
//! The stub is a plain TCP listener that reads one request and answers with
//! a canned HTTP response, so no real Exchange server is needed.

#![allow(clippy::unwrap_used)]

use std::error::Error as _;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mail4ews_core::{ConnectionParams, Defaults, Error, ServiceFactory, SessionProperties, keys};

const INBOX_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<m:GetFolderResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages" xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
<m:ResponseMessages><m:GetFolderResponseMessage ResponseClass="Success">
<m:ResponseCode>NoError</m:ResponseCode>
<m:Folders><t:Folder><t:FolderId Id="AAMkAD=" ChangeKey="AQAAAB"/><t:DisplayName>Inbox</t:DisplayName>
<t:TotalCount>1</t:TotalCount><t:ChildFolderCount>0</t:ChildFolderCount><t:UnreadCount>0</t:UnreadCount></t:Folder></m:Folders>
</m:GetFolderResponseMessage></m:ResponseMessages></m:GetFolderResponse></s:Body></s:Envelope>"#;

const ACCESS_DENIED_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>
<m:GetFolderResponse xmlns:m="http://schemas.microsoft.com/exchange/services/2006/messages">
<m:ResponseMessages><m:GetFolderResponseMessage ResponseClass="Error">
<m:MessageText>Access is denied. Check credentials and try again.</m:MessageText>
<m:ResponseCode>ErrorAccessDenied</m:ResponseCode>
</m:GetFolderResponseMessage></m:ResponseMessages></m:GetFolderResponse></s:Body></s:Envelope>"#;

/// Serves exactly one request, returning what the client sent.
async fn stub_server(status_line: &'static str, body: &'static str) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !String::from_utf8_lossy(&request).contains("</soap:Envelope>") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "{status_line}\r\nContent-Type: text/xml; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (addr, handle)
}

fn factory() -> ServiceFactory {
    ServiceFactory::new(Arc::new(Defaults::load())).with_global_trace(false)
}

fn verifying_session() -> SessionProperties {
    SessionProperties::new()
        .with(keys::VERIFY_CONNECTION_ON_CONNECT, "true")
        .with(keys::CONNECTION_TIMEOUT, "5000")
}

fn params(addr: SocketAddr) -> ConnectionParams {
    ConnectionParams::new(format!("http://{addr}/EWS/Exchange.asmx"))
        .port(addr.port())
        .user("alice")
        .password("secret")
}

#[tokio::test]
async fn verified_service_is_returned() {
    let (addr, server) = stub_server("HTTP/1.1 200 OK", INBOX_RESPONSE).await;

    let service = factory()
        .build_service(&params(addr), &verifying_session())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(service.url().unwrap().port(), Some(addr.port()));

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /EWS/Exchange.asmx"));
    assert!(request.to_ascii_lowercase().contains("authorization: basic"));
    assert!(request.contains(r#"<t:DistinguishedFolderId Id="inbox"/>"#));
    assert!(request.contains(r#"Version="Exchange2010_SP2""#));
}

#[tokio::test]
async fn requested_version_is_sent() {
    let (addr, server) = stub_server("HTTP/1.1 200 OK", INBOX_RESPONSE).await;
    let session = verifying_session().with(keys::EXCHANGE_VERSION, "Exchange2010");

    factory()
        .build_service(&params(addr), &session)
        .await
        .unwrap()
        .unwrap();

    let request = server.await.unwrap();
    assert!(request.contains(r#"<t:RequestServerVersion Version="Exchange2010"/>"#));
}

#[tokio::test]
async fn rejected_credentials_are_unauthorized() {
    let (addr, _server) = stub_server("HTTP/1.1 401 Unauthorized", "").await;

    let err = factory()
        .build_service(&params(addr), &verifying_session())
        .await
        .unwrap_err();

    match err {
        Error::Unauthorized(message) => assert!(message.contains("401"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn ews_error_response_is_unauthorized() {
    let (addr, _server) = stub_server("HTTP/1.1 200 OK", ACCESS_DENIED_RESPONSE).await;

    let err = factory()
        .build_service(&params(addr), &verifying_session())
        .await
        .unwrap_err();

    match &err {
        Error::Unauthorized(message) => {
            assert!(message.contains("ErrorAccessDenied"));
            assert!(message.contains("Access is denied."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.source().is_none());
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = factory()
        .build_service(&params(addr), &verifying_session())
        .await
        .unwrap_err();

    match &err {
        Error::Unreachable { message, source } => {
            assert!(source.is_connection_refused());
            match source {
                mail4ews_client::Error::ConnectionRefused { message: cause, .. } => {
                    assert_eq!(message, cause);
                }
                other => panic!("unexpected source: {other:?}"),
            }
            assert_eq!(&err.to_string(), message);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.source().is_some());
}

#[tokio::test]
async fn unknown_host_is_unauthorized() {
    let params = ConnectionParams::new("http://no-such-host.invalid/EWS/Exchange.asmx")
        .user("alice")
        .password("secret");

    let err = factory()
        .build_service(&params, &verifying_session())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized(_)), "unexpected error: {err:?}");
    assert!(err.source().is_none());
}

#[tokio::test]
async fn tls_handshake_failure_is_unauthorized() {
    // Plain-text peer behind an https URL: the TLS handshake fails.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let _ = socket
            .write_all(b"HTTP/1.1 400 Bad Request\r\nConnection: close\r\n\r\n")
            .await;
        let _ = socket.shutdown().await;
    });

    let params = ConnectionParams::new(format!("https://{addr}/EWS/Exchange.asmx"))
        .user("alice")
        .password("secret");

    let err = factory()
        .build_service(&params, &verifying_session())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized(_)), "unexpected error: {err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn unverified_service_sends_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let service = factory()
        .build_service(&params(addr), &SessionProperties::new())
        .await
        .unwrap();
    assert!(service.is_some());

    let accepted =
        tokio::time::timeout(std::time::Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err(), "no connection expected without verification");
}
