//! Interface and implementation synthesis.

use crate::config::Naming;
use crate::types::{ConversionResult, FieldDescriptor, MethodDescriptor};

const INDENT: &str = "  ";

/// Body emitted when a strategy reports a member without one.
const MISSING_BODY: &str = "=> throw UnimplementedError();";

/// Renders the abstract interface and the implementing class.
///
/// Output is a pure function of the inputs. Static methods never appear;
/// setters appear only in the implementation.
#[must_use]
pub fn generate(
    class_name: &str,
    naming: &Naming,
    fields: &[FieldDescriptor],
    methods: &[MethodDescriptor],
) -> ConversionResult {
    let interface_name = naming.interface_name(class_name);
    let implementation_name = naming.implementation_name(class_name);
    let methods: Vec<&MethodDescriptor> = methods.iter().filter(|m| !m.is_static).collect();

    ConversionResult {
        interface_text: interface(&interface_name, fields, &methods),
        concrete_text: implementation(&implementation_name, &interface_name, fields, &methods),
    }
}

fn interface(name: &str, fields: &[FieldDescriptor], methods: &[&MethodDescriptor]) -> String {
    let field_getters: Vec<String> = fields
        .iter()
        .map(|f| format!("{INDENT}{};", typed(&f.ty, &format!("get {}", f.name))))
        .collect();
    let getters: Vec<String> = methods
        .iter()
        .filter(|m| m.is_getter)
        .map(|m| format!("{INDENT}{};", typed(&m.return_type, &format!("get {}", m.name))))
        .collect();
    let signatures: Vec<String> = methods
        .iter()
        .filter(|m| m.is_plain())
        .map(|m| format!("{INDENT}{};", typed(&m.return_type, &format!("{}{}", m.name, m.params))))
        .collect();

    let groups: Vec<String> = [field_getters, getters, signatures]
        .into_iter()
        .filter(|g| !g.is_empty())
        .map(|g| g.join("\n"))
        .collect();

    block(&format!("abstract class {name}"), &groups)
}

fn implementation(
    name: &str,
    interface_name: &str,
    fields: &[FieldDescriptor],
    methods: &[&MethodDescriptor],
) -> String {
    let mut members: Vec<String> = Vec::new();

    members.extend(
        fields
            .iter()
            .map(|f| format!("{INDENT}@override\n{INDENT}final {} {};", f.ty, f.name)),
    );
    members.extend(methods.iter().filter(|m| m.is_getter).map(|m| {
        format!(
            "{INDENT}@override\n{INDENT}{} {}",
            typed(&m.return_type, &format!("get {}", m.name)),
            body_with_modifier(m)
        )
    }));
    members.extend(methods.iter().filter(|m| m.is_setter).map(|m| {
        format!(
            "{INDENT}{} {}",
            typed(&m.return_type, &format!("set {}{}", m.name, m.params)),
            body_with_modifier(m)
        )
    }));
    members.extend(methods.iter().filter(|m| m.is_plain()).map(|m| {
        format!(
            "{INDENT}@override\n{INDENT}{} {}",
            typed(&m.return_type, &format!("{}{}", m.name, m.params)),
            body_with_modifier(m)
        )
    }));

    if !fields.is_empty() {
        let params: Vec<String> = fields.iter().map(|f| format!("this.{}", f.name)).collect();
        members.push(format!("{INDENT}{name}({});", params.join(", ")));
    }

    block(
        &format!("class {name} implements {interface_name}"),
        &members,
    )
}

/// `head {`, the parts separated by blank lines, then `}`.
fn block(head: &str, parts: &[String]) -> String {
    if parts.is_empty() {
        format!("{head} {{\n}}")
    } else {
        format!("{head} {{\n{}\n}}", parts.join("\n\n"))
    }
}

/// Prefixes `rest` with `ty` unless the type was omitted in the source.
fn typed(ty: &str, rest: &str) -> String {
    if ty.is_empty() {
        rest.to_owned()
    } else {
        format!("{ty} {rest}")
    }
}

fn body_with_modifier(m: &MethodDescriptor) -> String {
    let body = if m.body.trim().is_empty() {
        MISSING_BODY
    } else {
        m.body.as_str()
    };
    match m.body_modifier() {
        Some(modifier) => format!("{modifier} {body}"),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, ret: &str, params: &str, body: &str) -> MethodDescriptor {
        MethodDescriptor {
            name: name.into(),
            return_type: ret.into(),
            params: params.into(),
            body: body.into(),
            ..MethodDescriptor::default()
        }
    }

    #[test]
    fn empty_class() {
        let r = generate("Empty", &Naming::default(), &[], &[]);
        assert_eq!(r.interface_text, "abstract class IEmpty {\n}");
        assert_eq!(r.concrete_text, "class EmptyImpl implements IEmpty {\n}");
    }

    #[test]
    fn constructor_follows_field_order() {
        let fields = [
            FieldDescriptor::new("String", "b"),
            FieldDescriptor::new("int", "a"),
        ];
        let r = generate("P", &Naming::default(), &fields, &[]);
        assert!(r.concrete_text.ends_with("  PImpl(this.b, this.a);\n}"));
        assert!(r.interface_text.contains("  String get b;\n  int get a;"));
    }

    #[test]
    fn setters_only_in_implementation() {
        let mut setter = method("value", "", "(int v)", "{ _v = v; }");
        setter.is_setter = true;
        let r = generate("S", &Naming::default(), &[], &[setter]);
        assert_eq!(r.interface_text, "abstract class IS {\n}");
        assert_eq!(
            r.concrete_text,
            "class SImpl implements IS {\n  set value(int v) { _v = v; }\n}"
        );
    }

    #[test]
    fn static_methods_are_dropped() {
        let mut s = method("create", "S", "()", "=> S();");
        s.is_static = true;
        let r = generate("S", &Naming::default(), &[], &[s]);
        assert!(!r.interface_text.contains("create"));
        assert!(!r.concrete_text.contains("create"));
    }

    #[test]
    fn modifiers_and_untyped_members() {
        let mut load = method("load", "Future<void>", "()", "{ await go(); }");
        load.is_async = true;
        let mut ticks = method("ticks", "Stream<int>", "()", "{ yield 1; }");
        ticks.is_async = true;
        ticks.is_generator = true;
        let describe = method("describe", "", "()", "=> 'x';");
        let r = generate(
            "M",
            &Naming::default(),
            &[],
            &[load, ticks, describe],
        );
        assert!(r.interface_text.contains("  describe();"));
        assert!(r
            .concrete_text
            .contains("  Future<void> load() async { await go(); }"));
        assert!(r.concrete_text.contains("  Stream<int> ticks() async* { yield 1; }"));
        assert!(r.concrete_text.contains("  @override\n  describe() => 'x';"));
    }

    #[test]
    fn missing_body_is_stubbed() {
        let r = generate("T", &Naming::default(), &[], &[method("run", "void", "()", "")]);
        assert!(r
            .concrete_text
            .contains("  void run() => throw UnimplementedError();"));
    }

    #[test]
    fn custom_naming() {
        let naming = Naming::new("Base", "Service");
        let r = generate("Auth", &naming, &[], &[]);
        assert!(r.interface_text.starts_with("abstract class BaseAuth {"));
        assert!(r
            .concrete_text
            .starts_with("class AuthService implements BaseAuth {"));
    }
}
