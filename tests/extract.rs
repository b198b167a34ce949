use regex_compare::{
    extract::{self, IdCheck, IdEntry, Strategy},
    Engine, ErrorKind, GroupTable,
};

use crate::suite;

#[test]
fn strategies_agree() -> anyhow::Result<()> {
    let tests = suite::ids()?;
    for engine in Engine::ALL {
        let check = IdCheck::new(engine, extract::LABEL)?;
        for t in tests.iter() {
            let got = check.check(&t.input)?;
            let got_id = got.map(|m| m.as_str().to_string());
            assert_eq!(t.id, got_id, "{}/{}", t.name, engine);
            let got_span = got.map(|m| [m.start(), m.end()]);
            assert_eq!(t.span, got_span, "{}/{}", t.name, engine);
        }
    }
    Ok(())
}

#[test]
fn linear_engines_reject_lookbehind() -> anyhow::Result<()> {
    for engine in Engine::ALL {
        let check = IdCheck::new(engine, extract::LABEL)?;
        let strategies: Vec<Strategy> = check.strategies().collect();
        if engine.is_linear() {
            assert_eq!(
                vec![Strategy::Positional, Strategy::Named],
                strategies,
                "{}",
                engine,
            );
            assert_eq!(1, check.unsupported().len());
            let err = &check.unsupported()[0];
            assert_eq!(ErrorKind::Syntax, err.kind());
            assert_eq!(engine, err.engine());
            assert_eq!(Strategy::Lookbehind.pattern("Id"), err.pattern());
        } else {
            assert_eq!(Strategy::ALL.to_vec(), strategies, "{}", engine);
            assert!(check.unsupported().is_empty());
        }
    }
    Ok(())
}

#[test]
fn label_inside_a_word_never_matches() -> anyhow::Result<()> {
    for engine in Engine::ALL {
        let check = IdCheck::new(engine, extract::LABEL)?;
        assert_eq!(None, check.check("OtherId: 123")?, "{}", engine);
        assert_eq!(None, check.check("PaidId 5")?, "{}", engine);
    }
    Ok(())
}

#[test]
fn custom_label() -> anyhow::Result<()> {
    for engine in Engine::ALL {
        let check = IdCheck::new(engine, "No.")?;
        let got = check.check("Invoice no. 77")?.map(|m| m.as_str());
        assert_eq!(Some("77"), got, "{}", engine);
        // The '.' in the label is literal.
        assert_eq!(None, check.check("Invoice nox 77")?, "{}", engine);
    }
    Ok(())
}

#[test]
fn scan_in_document_order() -> anyhow::Result<()> {
    for t in suite::scans()? {
        let expected: Vec<IdEntry> = t
            .entries
            .iter()
            .map(|e| IdEntry { label: e.label.clone(), id: e.id.clone() })
            .collect();
        let expected_spans: Vec<[usize; 2]> =
            t.entries.iter().map(|e| e.span).collect();
        for engine in Engine::ALL {
            let re = engine.compile(extract::SCAN)?;
            let by_index = extract::scan_by_index(&*re, &t.document)?;
            let by_name = extract::scan_by_name(&*re, &t.document)?;
            assert_eq!(expected, by_index, "{}/{}", t.name, engine);
            assert_eq!(expected, by_name, "{}/{}", t.name, engine);

            let mut spans = vec![];
            for result in re.captures_iter(&t.document) {
                let caps = result?;
                let start = caps.name("type").map(|m| m.start());
                let end = caps.name("id").map(|m| m.end());
                if let (Some(start), Some(end)) = (start, end) {
                    spans.push([start, end]);
                }
            }
            assert_eq!(expected_spans, spans, "{}/{}", t.name, engine);
        }
    }
    Ok(())
}

#[test]
fn bundled_document() -> anyhow::Result<()> {
    let re = Engine::Backtrack.compile(extract::SCAN)?;
    let entries = extract::scan_by_name(&*re, extract::DOCUMENT)?;
    let ids: Vec<&str> = entries.iter().map(|e| &*e.id).collect();
    assert_eq!(vec!["123", "456", "789"], ids);
    Ok(())
}

#[test]
fn group_table_is_stable() -> anyhow::Result<()> {
    let mut tables: Vec<GroupTable> = vec![];
    for engine in Engine::ALL {
        let first = engine.compile(extract::SCAN)?;
        let second = engine.compile(extract::SCAN)?;
        assert_eq!(first.group_table(), second.group_table(), "{}", engine);

        let table = first.group_table();
        assert_eq!("{id=2, type=1}", table.to_string(), "{}", engine);
        let declared: Vec<(&str, usize)> = table.declared().collect();
        assert_eq!(vec![("type", 1), ("id", 2)], declared, "{}", engine);
        assert_eq!(Some(1), table.index("type"));
        assert_eq!(Some(2), table.index("id"));
        assert_eq!(None, table.index("label"));
        tables.push(GroupTable::clone(table));
    }
    // Every engine derives the same table from the same pattern.
    assert!(tables.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}
