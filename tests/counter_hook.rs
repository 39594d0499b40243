use resolvers::{
    make_action_creators, make_reducer, make_resolvers, Action, ChangeObserver, HookContext,
    Reducer, ResolverMap, Root,
};
use serde_json::json;

fn counter() -> ResolverMap<i32> {
    ResolverMap::builder()
        .resolver("increment", |state: i32| move || state + 1)
        .resolver("decrement", |state: i32| move || state - 1)
        .resolver("add", |state: i32| move |amount: i32| state + amount)
        .build()
}

#[tokio::test]
async fn counter_hook_follows_bound_actions() -> anyhow::Result<()> {
    let use_counter = make_resolvers(counter(), 0);
    let mut root = Root::new();

    let (state, actions) = use_counter.use_resolvers(&mut root);
    assert_eq!(state, 0);
    let mut changes = root.store(use_counter.id()).unwrap().observe();

    actions.typed::<()>("increment").unwrap().call(())?;
    actions.typed::<(i32,)>("add").unwrap().call((5,))?;
    actions.typed::<()>("decrement").unwrap().call(())?;
    root.settle().await;

    let (state, _) = use_counter.use_resolvers(&mut root);
    assert_eq!(state, 5);
    for _ in 0..3 {
        changes.try_recv()?;
    }
    Ok(())
}

#[test]
fn reducer_and_creators_agree_on_the_wire() -> anyhow::Result<()> {
    let resolvers = counter();
    let creators = make_action_creators(&resolvers);
    let reducer = make_reducer(resolvers, 0);

    let wire = serde_json::to_string(&creators.get("add").unwrap().create([json!(2)]))?;
    assert_eq!(wire, r#"{"name":"add","payload":[2]}"#);

    let action: Action = serde_json::from_str(&wire)?;
    assert_eq!(reducer.reduce(5, &action), 7);

    let multiply: Action = serde_json::from_str(r#"{"name":"multiply","payload":[2]}"#)?;
    assert_eq!(reducer.reduce(5, &multiply), 5);
    Ok(())
}
