/// Error message catalog. Semantic checks choose a stable key and supply
/// arguments; this module owns presentation. Message templates use
/// printf-style `%s` slots, substituted in order.
pub fn message_of(key: &str) -> &'static str {
    match key {
        "already_has_expr" => "%s already has expression",
        "argument_overflow" => "argument overflow",
        "auto_sized_array" => "array size must be explicit here",
        "builtin_as_anonymous_fn" => "builtin functions cannot be used as anonymous function",
        "dynamic_type_annotation_failed" => "dynamic type annotation failed",
        "enum_not_supports_as_generic" => "enums are not supported as generic type",
        "exist_id" => "identifier already exists: %s",
        "generics_overflow" => "overflow generics",
        "genericed_fn_as_anonymous_fn" => {
            "generic functions cannot be used as anonymous function"
        }
        "ident_not_exist" => "identifier not exist: %s",
        "illegal_cycle_in_declaration" => "illegal cycle in declaration: %s",
        "incompatible_types" => "%s and %s data-types are not compatible",
        "invalid_map_key_type" => "invalid data-type for map key: %s",
        "invalid_numeric_range" => "arithmetic value overflow",
        "invalid_syntax" => "invalid syntax",
        "invalid_type" => "invalid data-type",
        "iter_range_require_enumerable_expr" => {
            "range iterations must have an enumerable expression"
        }
        "method_as_anonymous_fn" => "methods cannot be used as anonymous function",
        "missing_expr_for" => "missing expression for %s",
        "missing_generics" => "missing generics",
        "missing_multi_ret" => "missing return values for multi return",
        "more_args_with_variadiced" => "variadic argument cannot be used with more arguments",
        "mutable_operation_on_immutable" => "mutable operation cannot be used with immutable data",
        "not_impl_trait_def" => "%s trait's %s define is not implemented",
        "overflow_limits" => "overflow the limit of data-type",
        "overflow_ret" => "overflow return expressions",
        "ptr_points_ref" => "pointers cannot point to references",
        "ref_refs_enum" => "references cannot reference enums",
        "ref_refs_ptr" => "references cannot reference pointers",
        "ref_refs_ref" => "references cannot reference references",
        "ref_refs_trait" => "references cannot reference traits",
        "ref_used_struct_used_at_new_fn" => {
            "structures with reference fields cannot be initialized with the new function"
        }
        "reference_field_not_initialized" => "reference field is not initialized: %s",
        "require_ret_expr" => "return statements of non-void functions must have an expression",
        "ret_with_mut_typed_non_mut" => "mutable typed return expressions must be mutable",
        "trait_has_reference_parametered_function" => {
            "trait has reference receiver parameter used function, \
             only reference values can implement this trait"
        }
        "tuple_assign_to_single" => "tuples cannot be assigned to a single define",
        "type_not_supports_generics" => "type does not support generics: %s",
        "variadic_parameter_not_last" => "variadic parameter can only be the last parameter",
        "void_function_ret_expr" => "void functions cannot return any value",
        _ => "unknown diagnostic",
    }
}

/// Render a catalog message with its arguments substituted.
pub fn format_message(key: &str, args: &[String]) -> String {
    let mut out = String::new();
    let mut args = args.iter();
    let mut rest = message_of(key);
    while let Some(i) = rest.find("%s") {
        out.push_str(&rest[..i]);
        out.push_str(args.next().map(String::as_str).unwrap_or("?"));
        rest = &rest[i + 2..];
    }
    out.push_str(rest);
    out
}
