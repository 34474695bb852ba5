/*
[INPUT]:  End-to-end protocol scenarios over a mock transport
[OUTPUT]: Test results for the correlation and dispatch engines
[POS]:    Integration tests - JSON-RPC client
[UPDATE]: When the client surface changes
*/

mod common;

use std::sync::{Arc, Mutex};

use common::{product_list_json, MockTransport};
use oracle_dash_client::{
    OracleClient, OracleError, PriceUpdate, ProductEntry, Result, Route,
};

fn open_client() -> (OracleClient<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let mut client = OracleClient::new(transport.clone());
    client.on_open();
    (client, transport)
}

#[test]
fn product_list_round_trip_decodes_entries() {
    let (mut client, transport) = open_client();

    let received: Arc<Mutex<Option<Result<Vec<ProductEntry>>>>> = Arc::new(Mutex::new(None));
    let received_in = Arc::clone(&received);
    client
        .get_product_list(move |products| {
            *received_in.lock().unwrap() = Some(products);
        })
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0]["method"], "get_product_list");
    assert_eq!(sent[0]["jsonrpc"], "2.0");
    assert_eq!(sent[0]["id"], 0);

    let response = serde_json::json!({ "id": 0, "result": product_list_json() });
    assert_eq!(
        client.on_frame(&response.to_string()),
        Route::Response { id: 0 }
    );

    let received = received.lock().unwrap();
    let products = received.as_ref().unwrap().as_ref().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].attr("symbol"), "ETH/USD");
    assert_eq!(products[1].price[0].price_exponent, -5);
}

#[test]
fn dashboard_startup_flow_delivers_projected_price() {
    let (mut client, transport) = open_client();

    // Step 1: product list.
    let products: Arc<Mutex<Vec<ProductEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let products_in = Arc::clone(&products);
    client
        .get_product_list(move |result| {
            *products_in.lock().unwrap() = result.unwrap();
        })
        .unwrap();
    let list_id = transport.last_id();
    let response = serde_json::json!({ "id": list_id, "result": product_list_json() });
    client.on_frame(&response.to_string());

    // Step 2: one subscribe per price account.
    let products = products.lock().unwrap().clone();
    let updates: Arc<Mutex<Vec<(usize, Result<PriceUpdate>)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut exponents = Vec::new();
    for (row, product) in products.iter().enumerate() {
        for price in &product.price {
            let updates_in = Arc::clone(&updates);
            exponents.push(price.price_exponent);
            client
                .subscribe_price(&price.account, move |update| {
                    updates_in.lock().unwrap().push((row, update));
                })
                .unwrap();
        }
    }

    // Acknowledgements arrive out of issue order with sparse ids.
    let sent = transport.sent();
    let first_sub_id = sent[1]["id"].as_u64().unwrap();
    let second_sub_id = sent[2]["id"].as_u64().unwrap();
    client.on_frame(
        &serde_json::json!({ "id": second_sub_id, "result": { "subscription": 11 } }).to_string(),
    );
    client.on_frame(
        &serde_json::json!({ "id": first_sub_id, "result": { "subscription": 4 } }).to_string(),
    );

    // Step 3: updates fan out to the right rows.
    let notify = serde_json::json!({
        "method": "notify_price",
        "params": {
            "subscription": 11,
            "result": {
                "price": 868725, "conf": 102, "twap": 868000, "twac": 98,
                "status": "trading", "valid_slot": 32008, "pub_slot": 32009
            }
        }
    });
    assert_eq!(
        client.on_frame(&notify.to_string()),
        Route::Notification { subscription: 11 }
    );

    let updates = updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    let (row, update) = &updates[0];
    assert_eq!(*row, 1, "subscription 11 belongs to the second price account");

    let fields = update.as_ref().unwrap().project(exponents[*row]).unwrap();
    assert_eq!(fields.price.to_string(), "8.68725");
    assert_eq!(fields.conf.to_string(), "0.00102");
}

#[test]
fn identifier_reuse_spans_request_kinds() {
    let (mut client, transport) = open_client();

    client.get_product_list(|_| {}).unwrap();
    assert_eq!(transport.last_id(), 0);

    let response = serde_json::json!({ "id": 0, "result": [] });
    client.on_frame(&response.to_string());

    // Freed id 0 is reassigned to the next request.
    client.subscribe_price("SomeAccount", |_| {}).unwrap();
    assert_eq!(transport.last_id(), 0);
}

#[test]
fn closed_transport_fails_sends_and_abandons_pending() {
    let (mut client, transport) = open_client();

    let outcome: Arc<Mutex<Option<Result<Vec<ProductEntry>>>>> = Arc::new(Mutex::new(None));
    let outcome_in = Arc::clone(&outcome);
    client
        .get_product_list(move |result| {
            *outcome_in.lock().unwrap() = Some(result);
        })
        .unwrap();

    transport.close();
    client.on_close();

    assert!(matches!(
        outcome.lock().unwrap().as_ref().unwrap(),
        Err(OracleError::NotConnected)
    ));
    assert!(matches!(
        client.get_product_list(|_| {}).unwrap_err(),
        OracleError::NotConnected
    ));
}

#[test]
fn frames_are_processed_to_completion_in_arrival_order() {
    let (mut client, transport) = open_client();

    let order: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let order_in = Arc::clone(&order);
    client
        .subscribe_price("AccountA", move |_| {
            order_in.lock().unwrap().push("update".to_string());
        })
        .unwrap();
    let sub_req_id = transport.last_id();

    let order_in = Arc::clone(&order);
    client
        .request(
            "ping",
            None,
            Box::new(move |_| order_in.lock().unwrap().push("pong".to_string())),
        )
        .unwrap();
    let ping_id = transport.last_id();

    client.on_frame(
        &serde_json::json!({ "id": sub_req_id, "result": { "subscription": 1 } }).to_string(),
    );
    let notify = serde_json::json!({
        "method": "notify_price",
        "params": {
            "subscription": 1,
            "result": {
                "price": 1, "conf": 1, "status": "trading",
                "valid_slot": 1, "pub_slot": 1
            }
        }
    });
    client.on_frame(&notify.to_string());
    client.on_frame(&serde_json::json!({ "id": ping_id, "result": {} }).to_string());
    client.on_frame(&notify.to_string());

    assert_eq!(
        *order.lock().unwrap(),
        vec!["update".to_string(), "pong".to_string(), "update".to_string()]
    );
}
