#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<(String, i32)>, String, String)| {
    let mut table = chunkroute::RouteTable::new();

    for (pattern, item) in data.0 {
        if table.get(pattern, item, ()).is_err() {
            return;
        }
    }

    let Ok(matcher) = chunkroute::Matcher::new(table) else {
        return;
    };

    let _ = matcher.at(&data.1, &data.2);
});
