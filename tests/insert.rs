use chunkroute::{InsertError, RouteTable};

struct InsertTest(Vec<(&'static str, Result<(), InsertError>)>);

impl InsertTest {
    fn run(self) {
        let mut table = RouteTable::new();
        for (route, expected) in self.0 {
            let got = table.get(route, route.to_owned(), ());
            assert_eq!(got, expected, "{route}");
        }
    }
}

fn unclosed(pattern: &'static str) -> InsertError {
    InsertError::UnclosedPlaceholder {
        pattern: pattern.into(),
    }
}

fn unnamed(pattern: &'static str) -> InsertError {
    InsertError::UnnamedParam {
        pattern: pattern.into(),
    }
}

#[test]
fn duplicates_are_allowed() {
    InsertTest(vec![
        ("/foo", Ok(())),
        ("/foo", Ok(())),
        ("/foo/{id}", Ok(())),
        ("/foo/{id}", Ok(())),
        ("/foo/{name}", Ok(())),
        ("/foo/{id:\\d+}", Ok(())),
    ])
    .run()
}

#[test]
fn placeholders() {
    InsertTest(vec![
        ("/user/{id", Err(unclosed("/user/{id"))),
        ("/user/{id:\\d{2}", Err(unclosed("/user/{id:\\d{2}"))),
        ("/user/{id:\\d{2}}", Ok(())),
        ("/user/{}", Err(unnamed("/user/{}"))),
        ("/user/{:\\d+}", Err(unnamed("/user/{:\\d+}"))),
        ("/user/{id:}", Ok(())),
        ("/user}", Ok(())),
        ("/{a}{b}", Ok(())),
        ("/{a}-{b}.{ext}", Ok(())),
    ])
    .run()
}

#[test]
fn fragments() {
    InsertTest(vec![
        ("/{id:\\d+}", Ok(())),
        ("/{id:(?:\\d+|new)}", Ok(())),
        ("/{slug:[a-z0-9-]+}", Ok(())),
        (
            "/{id:(\\d+)}",
            Err(InsertError::CapturingFragment { name: "id".into() }),
        ),
        (
            "/{id:(?P<n>\\d+)}",
            Err(InsertError::CapturingFragment { name: "id".into() }),
        ),
    ])
    .run()
}

#[test]
fn invalid_fragment() {
    let mut table = RouteTable::<(), ()>::new();

    let err = table.get("/{id:[0-9}", (), ()).unwrap_err();
    match err {
        InsertError::InvalidFragment { name, reason } => {
            assert_eq!(name, "id");
            assert!(!reason.is_empty());
        }
        err => panic!("unexpected error: {err:?}"),
    }

    // nothing was registered
    assert_eq!(table.payload_count(), 0);
    assert!(table.contents().variables().is_empty());
}

#[test]
fn method_shortcuts() {
    let mut table = RouteTable::new();
    table.get("/", 0, ()).unwrap();
    table.head("/", 1, ()).unwrap();
    table.post("/", 2, ()).unwrap();
    table.put("/", 3, ()).unwrap();
    table.patch("/", 4, ()).unwrap();
    table.delete("/", 5, ()).unwrap();
    table.options("/", 6, ()).unwrap();

    let methods = table
        .contents()
        .statics()
        .iter()
        .map(|(method, routes)| (method.as_str(), routes[0].payload_id()))
        .collect::<Vec<_>>();

    assert_eq!(
        methods,
        [
            ("GET", 0),
            ("HEAD", 1),
            ("POST", 2),
            ("PUT", 3),
            ("PATCH", 4),
            ("DELETE", 5),
            ("OPTIONS", 6),
        ]
    );
}
