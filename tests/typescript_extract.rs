use pretty_assertions::assert_eq;
use shapedoc::extractor::brace::BraceExtractor;
use shapedoc::extractor::extract::LanguageExtractor;
use shapedoc::extractor::profile::TYPESCRIPT;
use shapedoc::model::{DeclKind, Visibility};
use std::path::Path;

#[test]
fn extract_service_namespace() {
    let source = r#"
import { Injectable } from '@angular/core';
import type { User } from './models';

export namespace Api {
  /** Shape of a response. */
  export interface Response<T> extends Base {
    data: T;
    error?: string;
    fetch(id: string): Promise<T>;
  }

  @Injectable({ providedIn: 'root' })
  export class UserService implements OnInit, Loader<User> {
    private cache = new Map<string, User>();
    static readonly VERSION: number = 2;

    constructor(private readonly http: HttpClient, public name?: string) {}

    async load(id: string, force = false): Promise<User> {
      return this.http.get(id);
    }

    protected get size(): number {
      return this.cache.size;
    }
  }
}

export const fetchUser = async (id: string): Promise<User> => api.get(id);

export function isUser(value: unknown): value is User {
  return true;
}
"#;
    let mut extractor = BraceExtractor::new(&TYPESCRIPT).unwrap();
    let record = extractor
        .extract(source, Path::new("src/app/user.service.ts"))
        .unwrap();

    assert_eq!(record.name, "user");
    assert_eq!(record.module_context, "Api");
    let deps: Vec<_> = record
        .dependencies
        .iter()
        .map(|dep| (dep.display_name(), dep.source_path.as_str()))
        .collect();
    assert_eq!(
        deps,
        vec![("Injectable", "@angular/core"), ("User", "./models")]
    );

    let names: Vec<_> = record.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Response", "UserService"]);

    let response = record.declaration("Response").unwrap();
    assert_eq!(response.kind, DeclKind::Interface);
    assert_eq!(response.comment.as_deref(), Some("Shape of a response."));
    assert_eq!(response.base_types, vec!["Base"]);
    let fields: Vec<_> = response
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.declared_type.as_deref(), f.visibility))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("data", Some("T"), Visibility::Public),
            ("error", Some("string"), Visibility::Public),
        ]
    );
    let fetch = response.callable("fetch").unwrap();
    assert_eq!(fetch.return_type.as_deref(), Some("Promise<T>"));
    assert_eq!(fetch.parameters[0].declared_type.as_deref(), Some("string"));

    let service = record.declaration("UserService").unwrap();
    assert_eq!(service.comment, None);
    assert_eq!(service.modifiers, vec!["export"]);
    assert_eq!(service.implemented_capabilities, vec!["OnInit", "Loader<User>"]);
    let fields: Vec<_> = service
        .fields
        .iter()
        .map(|f| (f.name.as_str(), f.declared_type.as_deref(), f.visibility))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("cache", None, Visibility::Private),
            ("VERSION", Some("number"), Visibility::Public),
            ("http", Some("HttpClient"), Visibility::Private),
            ("name", Some("string"), Visibility::Public),
        ]
    );
    assert_eq!(service.field("VERSION").unwrap().is_static, Some(true));

    let methods: Vec<_> = service.callables.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(methods, vec!["constructor", "load", "size"]);
    let ctor = service.callable("constructor").unwrap();
    assert_eq!(ctor.parameter_names(), vec!["http", "name"]);
    let size = service.callable("size").unwrap();
    assert_eq!(size.visibility, Some(Visibility::Protected));
    assert_eq!(size.return_type.as_deref(), Some("number"));

    let functions: Vec<_> = record
        .top_level_callables
        .iter()
        .map(|c| (c.name.as_str(), c.return_type.as_deref()))
        .collect();
    assert_eq!(
        functions,
        vec![
            ("fetchUser", Some("Promise<User>")),
            ("isUser", Some("value is User")),
        ]
    );
}

#[test]
fn abstract_class_with_anonymous_default() {
    let source = "export default abstract class\n  extends Base {\n  abstract render(): void;\n}\n";
    let mut extractor = BraceExtractor::new(&TYPESCRIPT).unwrap();
    let record = extractor.extract(source, Path::new("view.tsx")).unwrap();
    assert_eq!(record.declarations.len(), 1);
    let view = &record.declarations[0];
    assert_eq!(view.name, "view");
    assert_eq!(view.modifiers, vec!["export", "default", "abstract"]);
    assert_eq!(view.base_types, vec!["Base"]);
    assert_eq!(view.callables[0].name, "render");
    assert_eq!(view.callables[0].return_type.as_deref(), Some("void"));
}

#[test]
fn generic_constraints_with_object_types() {
    let source = r#"
export class Repo<T extends { id: string }> implements Store {
  items: T[] = [];
  find(id: string): T | undefined {
    return this.items.find((item) => item.id === id);
  }
}

export function pick<T extends object = {}>(value: T): T {
  return value;
}
"#;
    let mut extractor = BraceExtractor::new(&TYPESCRIPT).unwrap();
    let record = extractor.extract(source, Path::new("repo.ts")).unwrap();

    assert_eq!(record.declarations.len(), 1);
    let repo = record.declaration("Repo").unwrap();
    assert_eq!(repo.implemented_capabilities, vec!["Store"]);
    assert!(repo.base_types.is_empty());
    assert_eq!(repo.fields.len(), 1);
    assert_eq!(repo.fields[0].name, "items");
    assert_eq!(repo.fields[0].declared_type.as_deref(), Some("T[]"));
    let methods: Vec<_> = repo.callables.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(methods, vec!["find"]);
    let find = repo.callable("find").unwrap();
    assert_eq!(find.parameter_names(), vec!["id"]);
    assert_eq!(find.return_type.as_deref(), Some("T | undefined"));

    assert_eq!(record.top_level_callables.len(), 1);
    let pick = &record.top_level_callables[0];
    assert_eq!(pick.name, "pick");
    assert_eq!(pick.parameter_names(), vec!["value"]);
    assert_eq!(pick.return_type.as_deref(), Some("T"));
}
