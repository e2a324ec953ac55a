use pretty_assertions::assert_eq;
use shapedoc::extractor::brace::BraceExtractor;
use shapedoc::extractor::extract::LanguageExtractor;
use shapedoc::extractor::profile::JAVASCRIPT;
use shapedoc::model::Visibility;
use std::path::Path;

#[test]
fn extract_component_module() {
    let source = r#"
import React, { useState } from 'react';
import * as path from 'path';
const fs = require('fs');

/**
 * Counts clicks.
 */
export default class Counter extends React.Component {
  static defaultProps = { step: 1 };
  count = 0;
  #secret = 'x';

  constructor(props) {
    super(props);
  }

  /** Increments the count. */
  increment(step = 1) {
    this.count += step;
  }

  get value() {
    return this.count;
  }

  static create() {
    return new Counter();
  }
}

export function formatCount(count, label = 'clicks') {
  return `${count} ${label}`;
}

export const double = (n) => n * 2;
const square = n => n * n;
async function load(url) {
  return fetch(url);
}
"#;
    let mut extractor = BraceExtractor::new(&JAVASCRIPT).unwrap();
    let record = extractor
        .extract(source, Path::new("src/components/Counter.jsx"))
        .unwrap();

    assert_eq!(record.name, "Counter");
    assert_eq!(record.module_context, "");

    let deps: Vec<_> = record
        .dependencies
        .iter()
        .map(|dep| (dep.display_name(), dep.source_path.as_str()))
        .collect();
    assert_eq!(
        deps,
        vec![
            ("React", "react"),
            ("useState", "react"),
            ("path", "path"),
            ("fs", "fs"),
        ]
    );

    assert_eq!(record.declarations.len(), 1);
    let counter = &record.declarations[0];
    assert_eq!(counter.name, "Counter");
    assert_eq!(counter.comment.as_deref(), Some("Counts clicks."));
    assert_eq!(counter.modifiers, vec!["export", "default"]);
    assert_eq!(counter.base_types, vec!["React.Component"]);

    let fields: Vec<_> = counter
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.visibility, f.is_static))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("defaultProps", Visibility::Public, Some(true)),
            ("count", Visibility::Public, Some(false)),
            ("#secret", Visibility::Private, Some(false)),
        ]
    );

    let methods: Vec<_> = counter.callables.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(methods, vec!["constructor", "increment", "value", "create"]);
    let increment = counter.callable("increment").unwrap();
    assert_eq!(increment.comment.as_deref(), Some("Increments the count."));
    assert_eq!(increment.parameters[0].name, "step");
    assert_eq!(increment.parameters[0].default_value.as_deref(), Some("1"));
    assert_eq!(increment.parameters[0].declared_type, None);

    let functions: Vec<_> = record
        .top_level_callables
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(functions, vec!["formatCount", "double", "square", "load"]);
    let format = &record.top_level_callables[0];
    assert_eq!(format.parameter_names(), vec!["count", "label"]);
    assert_eq!(format.parameters[1].default_value.as_deref(), Some("'clicks'"));
    assert_eq!(record.top_level_callables[1].parameter_names(), vec!["n"]);
    assert_eq!(record.top_level_callables[2].parameter_names(), vec!["n"]);
    assert_eq!(record.top_level_callables[3].parameter_names(), vec!["url"]);
}

#[test]
fn statements_without_semicolons() {
    let source = "import { a,\n  b } from './lib'\nexport function run(x)\n{\n  return a(x)\n}\nconst value = 3\n";
    let mut extractor = BraceExtractor::new(&JAVASCRIPT).unwrap();
    let record = extractor.extract(source, Path::new("run.mjs")).unwrap();
    let deps: Vec<_> = record
        .dependencies
        .iter()
        .map(|dep| dep.display_name())
        .collect();
    assert_eq!(deps, vec!["a", "b"]);
    assert_eq!(record.top_level_callables.len(), 1);
    assert_eq!(record.top_level_callables[0].name, "run");
}
