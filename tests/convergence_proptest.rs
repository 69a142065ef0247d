//! Property-based convergence testing: random interleavings of local inserts/deletes on both
//! sites, exchanged to completion, must leave both documents identical.

use jupiter_ot::document::Document;
use jupiter_ot::operation::Operation;
use jupiter_ot::site::{Role, SiteState};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum EditOp {
    Insert { pos_pct: f64, text: String },
    Delete { pos_pct: f64, len_pct: f64 },
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0.0..=1.0f64, "[a-z]{1,5}").prop_map(|(pos_pct, text)| EditOp::Insert { pos_pct, text }),
        (0.0..=1.0f64, 0.0..=1.0f64)
            .prop_map(|(pos_pct, len_pct)| EditOp::Delete { pos_pct, len_pct }),
    ]
}

/// Builds an `Operation` for `op` against `site`'s current document, clamping positions and
/// lengths to stay in bounds (a delete with nothing left to remove degenerates to a no-op
/// insert of the empty string, which is harmless and keeps the record bookkeeping uniform).
fn build_operation(site: &SiteState, op: &EditOp) -> Operation {
    let doc = site.document();
    let len = doc.len();
    match op {
        EditOp::Insert { pos_pct, text } => {
            let pos = ((*pos_pct * len as f64) as usize).min(len);
            Operation::insert(pos, text.clone())
        }
        EditOp::Delete { pos_pct, len_pct } => {
            if len == 0 {
                return Operation::insert(0, "");
            }
            let pos = ((*pos_pct * len as f64) as usize).min(len - 1);
            let max_len = len - pos;
            let del_len = (((*len_pct * max_len as f64) as usize).max(1)).min(max_len);
            let text = doc.slice(pos, del_len).expect("range within bounds by construction");
            Operation::delete(pos, text)
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn two_sites_converge_after_exchanging_random_edits(
        initial in "[a-z]{0,20}",
        server_ops in prop::collection::vec(arbitrary_edit_op(), 0..15),
        client_ops in prop::collection::vec(arbitrary_edit_op(), 0..15),
    ) {
        let mut server = SiteState::new(Document::new(&initial), 1, Role::Server);
        let mut client = SiteState::new(Document::new(&initial), 2, Role::Client);

        let mut to_client = Vec::new();
        for op in &server_ops {
            let built = build_operation(&server, op);
            to_client.push(server.local_op(built).unwrap());
        }

        let mut to_server = Vec::new();
        for op in &client_ops {
            let built = build_operation(&client, op);
            to_server.push(client.local_op(built).unwrap());
        }

        let server_time_before = server.vector_time();
        let client_time_before = client.vector_time();

        for record in to_client {
            server.remote_op(record).unwrap();
        }
        for record in to_server {
            client.remote_op(record).unwrap();
        }

        prop_assert_eq!(server.document().to_string(), client.document().to_string());

        prop_assert!(server.vector_time().local >= server_time_before.local);
        prop_assert!(server.vector_time().remote >= server_time_before.remote);
        prop_assert!(client.vector_time().local >= client_time_before.local);
        prop_assert!(client.vector_time().remote >= client_time_before.remote);
    }
}
