use std::collections::HashMap;

use specrun_core::ErrorKind;
use specrun_core::lang::errors;

#[test]
fn exception_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, ErrorKind> = HashMap::new();

    for info in errors::EXCEPTIONS {
        assert_eq!(
            errors::from_str(info.item.canonical),
            Some(info.item.id),
            "exception canonical spelling not resolvable: {}",
            info.item.canonical
        );
        assert_eq!(
            errors::as_str(info.item.id),
            info.item.canonical,
            "exception as_str mismatch for {:?}",
            info.item.id
        );

        if let Some(prev) = seen.insert(info.item.canonical, info.item.id) {
            panic!(
                "duplicate exception spelling {:?}: {:?} and {:?}",
                info.item.canonical, prev, info.item.id
            );
        }
    }
}

#[test]
fn exception_descriptions_are_present() {
    for info in errors::EXCEPTIONS {
        assert!(
            !info.item.description.trim().is_empty(),
            "missing description for {}",
            info.item.canonical
        );
    }
}

#[test]
fn exception_hierarchy_is_acyclic_and_rooted() {
    for info in errors::EXCEPTIONS {
        let mut steps = 0;
        let mut current = Some(info.item.id);
        while let Some(kind) = current {
            steps += 1;
            assert!(steps <= errors::EXCEPTIONS.len(), "cycle through {}", info.item.canonical);
            current = kind.parent();
        }
    }
    let roots: Vec<_> = errors::EXCEPTIONS.iter().filter(|e| e.parent.is_none()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].item.id, ErrorKind::StandardError);
}

#[test]
fn lookup_is_case_sensitive() {
    assert_eq!(errors::from_str("typeerror"), None);
    assert_eq!(errors::from_str("TypeError"), Some(ErrorKind::TypeError));
}
