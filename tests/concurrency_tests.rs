// Concurrent page requests stay within the configured limit

use rental_scout::config::{FetchSettings, ProviderSettings, Settings};
use rental_scout::{CityId, FilterSpec, ListingSource, RentFaster};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const TOTAL: u64 = 50;
const PAGE_SIZE: u64 = 10;

/// Counts search requests being served at once
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

/// Start a provider that holds every search response for a while
async fn slow_provider(in_flight: Arc<InFlight>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            tokio::spawn(respond(stream, in_flight.clone()));
        }
    });

    format!("http://{}", addr)
}

async fn respond(mut stream: TcpStream, in_flight: Arc<InFlight>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request);
    let target = request.split_whitespace().nth(1).unwrap_or_default().to_string();

    let body = if target.starts_with("/api/fields.json") {
        json!({"neighborhood": ["Beltline"]})
    } else {
        let page: u64 = target
            .split('&')
            .find_map(|pair| pair.strip_prefix("cur_page="))
            .and_then(|n| n.parse().ok())
            .unwrap_or(0);

        let now = in_flight.current.fetch_add(1, Ordering::SeqCst) + 1;
        in_flight.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        in_flight.current.fetch_sub(1, Ordering::SeqCst);
        in_flight.served.fetch_add(1, Ordering::SeqCst);

        let listings: Vec<_> = (page * PAGE_SIZE..(page + 1) * PAGE_SIZE)
            .map(|id| json!({"ref_id": id, "price": 1000 + id, "type": "Apartment"}))
            .collect();
        json!({"total": TOTAL, "total2": PAGE_SIZE, "listings": listings})
    };

    let body = body.to_string();
    let response = format!(
        concat!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n",
            "content-length: {}\r\nconnection: close\r\n\r\n{}"
        ),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn settings(base_url: String, concurrency: usize) -> Settings {
    Settings {
        provider: ProviderSettings {
            base_url,
            timeout_secs: 5,
            ..ProviderSettings::default()
        },
        fetch: FetchSettings { concurrency },
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_single_permit_serializes_page_requests() {
    let in_flight = Arc::new(InFlight::default());
    let base_url = slow_provider(in_flight.clone()).await;

    let client = RentFaster::connect(CityId::Calgary, &settings(base_url, 1))
        .await
        .unwrap();
    let results = client.search(&FilterSpec::default()).await.unwrap();

    assert_eq!(in_flight.peak.load(Ordering::SeqCst), 1);
    assert_eq!(in_flight.served.load(Ordering::SeqCst), 5);
    assert_eq!(results.pages_fetched, 5);
    assert_eq!(results.len(), 50);
}

#[tokio::test]
async fn test_page_requests_overlap_up_to_limit() {
    let in_flight = Arc::new(InFlight::default());
    let base_url = slow_provider(in_flight.clone()).await;

    let client = RentFaster::connect(CityId::Calgary, &settings(base_url, 3))
        .await
        .unwrap();
    let results = client.search(&FilterSpec::default()).await.unwrap();

    let peak = in_flight.peak.load(Ordering::SeqCst);
    assert!(peak > 1, "pages were never fetched in parallel");
    assert!(peak <= 3, "{} requests in flight with 3 permits", peak);
    assert_eq!(in_flight.served.load(Ordering::SeqCst), 5);
    assert!(results.is_complete());
}
