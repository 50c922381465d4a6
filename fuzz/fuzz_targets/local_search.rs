#![no_main]

use libfuzzer_sys::fuzz_target;
use sonicbrowse::model::Playlist;
use sonicbrowse::search;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mid = (0..=text.len() / 2)
        .rev()
        .find(|idx| text.is_char_boundary(*idx))
        .unwrap_or(0);
    let (head, query) = text.split_at(mid);
    let snapshot: Vec<Playlist> = head
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            let mut fields = line.splitn(3, '|');
            Playlist::new(
                &idx.to_string(),
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
                fields.next().unwrap_or_default(),
            )
        })
        .collect();

    let view = search::filter(&snapshot, query);

    let mut cursor = snapshot.iter();
    for item in &view {
        assert!(cursor.any(|candidate| candidate.id == item.id));
    }
    if query.is_empty() {
        assert_eq!(view.len(), snapshot.len());
    }
});
