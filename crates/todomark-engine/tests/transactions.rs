use todomark_engine::transact::ops;
use todomark_engine::{
    Document, OpKey, TodoConfig, TodoId, TransactionError, TransactionManager, TxContext,
};

fn doc(text: &str) -> Document {
    Document::new(text, TodoConfig::default())
}

fn check_item(ctx: &TxContext<'_>, id: TodoId) {
    ctx.add_op(
        OpKey::with_args("set-state", vec![id.to_string(), "checked".to_string()]),
        move |ctx| {
            let item = ctx
                .todo(id)
                .ok_or_else(|| anyhow::anyhow!("todo {id} vanished"))?;
            Ok(ops::set_state(item, ctx.config(), "checked")
                .into_iter()
                .collect())
        },
    );
}

#[test]
fn completing_a_subtree_is_one_round() {
    let mut d = doc(
        "- [ ] release\n\
         \x20 - [ ] tag\n\
         \x20 - [ ] changelog\n",
    );
    let manager = TransactionManager::new();
    manager
        .run(&mut d, |ctx| {
            let root = ctx.todo_at_row(0).unwrap();
            let targets: Vec<TodoId> =
                std::iter::once(root.id).chain(root.children.iter().copied()).collect();
            for id in targets {
                check_item(ctx, id);
            }
        })
        .unwrap();

    assert_eq!(d.version(), 1);
    assert_eq!(
        d.text(),
        "- [x] release\n\
         \x20 - [x] tag\n\
         \x20 - [x] changelog\n"
    );
}

#[test]
fn duplicate_requests_across_entry_and_callback_collapse() {
    let mut d = doc("- [ ] task\n");
    let manager = TransactionManager::new();
    let id = d.todos().roots()[0];
    manager
        .run(&mut d, move |ctx| {
            check_item(ctx, id);
            ctx.add_callback(move |ctx| {
                // same key as the entry op: collapsed, no second round
                check_item(ctx, id);
                Ok(())
            });
        })
        .unwrap();

    assert_eq!(d.version(), 1);
    assert_eq!(d.text(), "- [x] task\n");
}

#[test]
fn chained_metadata_follows_a_state_change() {
    let mut d = doc("- [ ] task\n");
    let manager = TransactionManager::new();
    manager
        .run(&mut d, |ctx| {
            let id = ctx.todo_at_row(0).unwrap().id;
            check_item(ctx, id);
            ctx.add_callback(move |ctx| {
                let item = ctx.todo(id).ok_or_else(|| anyhow::anyhow!("gone"))?;
                anyhow::ensure!(item.state == "checked");
                ctx.add_op(OpKey::new("stamp"), move |ctx| {
                    let item = ctx.todo(id).ok_or_else(|| anyhow::anyhow!("gone"))?;
                    Ok(vec![ops::set_metadata(item, ctx.config(), "done", "today")])
                });
                Ok(())
            });
        })
        .unwrap();

    assert_eq!(d.text(), "- [x] task @done(today)\n");
    assert_eq!(d.version(), 2);
}

#[test]
fn aborted_transaction_leaves_no_partial_round() {
    let mut d = doc("- [ ] a\n- [ ] b\n");
    let manager = TransactionManager::new();
    let result = manager.run(&mut d, |ctx| {
        let id = ctx.todo_at_row(0).unwrap().id;
        check_item(ctx, id);
        ctx.add_op(OpKey::new("explode"), |_| anyhow::bail!("disk on fire"));
    });

    let Err(TransactionError::Op { name, .. }) = result else {
        panic!("expected an op failure");
    };
    assert_eq!(name, "explode");
    assert_eq!(d.text(), "- [ ] a\n- [ ] b\n");
    assert_eq!(d.version(), 0);
    // the document is free for the next transaction
    manager.run(&mut d, |_| {}).unwrap();
}

#[test]
fn transactions_on_different_documents_are_independent() {
    let mut one = doc("- [ ] a\n");
    let mut two = doc("- [ ] b\n");
    let manager = TransactionManager::new();

    manager
        .run(&mut one, |ctx| {
            let id = ctx.todo_at_row(0).unwrap().id;
            check_item(ctx, id);
            assert!(!ctx.document().id().to_string().is_empty());
        })
        .unwrap();
    manager
        .run(&mut two, |ctx| {
            let id = ctx.todo_at_row(0).unwrap().id;
            check_item(ctx, id);
        })
        .unwrap();

    assert_eq!(one.text(), "- [x] a\n");
    assert_eq!(two.text(), "- [x] b\n");
}
