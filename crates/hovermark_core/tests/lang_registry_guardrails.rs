use std::collections::HashMap;

use hovermark_core::lang::keywords;
use hovermark_core::lang::library::{self, CORE_FUNCTIONS, CORE_TYPES};
use hovermark_core::lang::operators;
use hovermark_core::lang::punctuation;

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, keywords::KeywordId> = HashMap::new();

    for (index, info) in keywords::KEYWORDS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "keyword table out of order at {:?}", info.id);
        assert_eq!(
            keywords::from_str(info.canonical),
            Some(info.id),
            "keyword canonical spelling not resolvable: {}",
            info.canonical
        );
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn operators_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, operators::OperatorId> = HashMap::new();

    for (index, info) in operators::OPERATORS.iter().enumerate() {
        assert_eq!(info.id as usize, index, "operator table out of order at {:?}", info.id);
        assert_eq!(operators::from_str(info.spelling), Some(info.id));
        if let Some(prev) = seen.insert(info.spelling, info.id) {
            panic!("duplicate operator spelling {:?}: {:?} and {:?}", info.spelling, prev, info.id);
        }
    }
}

#[test]
fn punctuation_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, punctuation::PunctuationId> = HashMap::new();

    for (index, info) in punctuation::PUNCTUATION.iter().enumerate() {
        assert_eq!(info.id as usize, index, "punctuation table out of order at {:?}", info.id);
        assert_eq!(punctuation::from_str(info.canonical), Some(info.id));
        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!("duplicate punctuation spelling {:?}: {:?} and {:?}", info.canonical, prev, info.id);
        }
    }
}

#[test]
fn operator_and_punctuation_spellings_do_not_collide() {
    for info in operators::OPERATORS {
        assert!(
            punctuation::from_str(info.spelling).is_none(),
            "{} is both an operator and punctuation",
            info.spelling
        );
    }
}

#[test]
fn precedence_table_is_ordered_by_binding_strength() {
    use operators::OperatorId::*;

    let order = [Eq, IfNull, OrOr, AndAnd, EqEq, Lt, Pipe, Caret, Amp, Shl, Plus, Star];
    for pair in order.windows(2) {
        let lower = operators::info_for(pair[0]).precedence;
        let higher = operators::info_for(pair[1]).precedence;
        assert!(lower < higher, "{:?} should bind looser than {:?}", pair[0], pair[1]);
    }
    assert!(operators::CONDITIONAL_PRECEDENCE < operators::info_for(IfNull).precedence);
    assert_eq!(operators::TYPE_TEST_PRECEDENCE, operators::info_for(Lt).precedence);
    assert!(operators::PREFIX_PRECEDENCE < operators::POSTFIX_PRECEDENCE);
}

fn balanced(text: &str) -> bool {
    let mut stack = Vec::new();
    for c in text.chars() {
        match c {
            '<' | '(' | '[' | '{' => stack.push(c),
            '>' => {
                if stack.pop() != Some('<') {
                    return false;
                }
            }
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

#[test]
fn core_library_type_texts_are_balanced() {
    for t in CORE_TYPES {
        for m in t.members.iter().chain(t.static_members) {
            assert!(balanced(m.ty), "{}.{} has unbalanced type {}", t.name, m.name, m.ty);
            for p in m.parameters {
                assert!(balanced(p.ty), "{}.{}({}) has unbalanced type {}", t.name, m.name, p.name, p.ty);
            }
        }
        for c in t.constructors {
            for p in c.parameters {
                assert!(balanced(p.ty), "{} constructor param {} is unbalanced", t.name, p.name);
            }
        }
    }
    for f in CORE_FUNCTIONS {
        assert!(balanced(f.return_type));
    }
}

#[test]
fn core_library_supertypes_are_registered() {
    let mut names = std::collections::HashSet::new();
    for t in CORE_TYPES {
        assert!(names.insert(t.name), "duplicate core type {}", t.name);
    }
    for t in CORE_TYPES {
        let supers = t.extends.into_iter().chain(t.implements.iter().copied());
        for sup in supers {
            let base = sup.split('<').next().unwrap_or(sup);
            assert!(library::type_named(base).is_some(), "{} names unknown supertype {}", t.name, sup);
        }
    }
}
