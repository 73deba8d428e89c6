// End-to-end tests for the K interpreter, driving the host-facing
// interpret() contract: full script text in, output text out.

use ki::interpret;
use ki::value::Value;
use ki::Interpreter;

#[test]
fn empty_script_produces_no_output() {
    assert_eq!(interpret(""), "");
    assert_eq!(interpret("\n\n   \n"), "");
}

#[test]
fn print_joins_arguments_with_spaces() {
    assert_eq!(interpret("print(1+2, \"hi\", true)"), "3 hi True");
    assert_eq!(interpret("print \"Sum:\", 1 + 2"), "Sum: 3");
}

#[test]
fn byte_prints_as_zero_padded_binary() {
    assert_eq!(interpret("byte b = 255\nprint b"), "11111111");
    assert_eq!(interpret("byte b = 5\nprint b"), "00000101");
}

#[test]
fn byte_out_of_range_is_a_type_error() {
    assert_eq!(
        interpret("byte b = 256"),
        "Line 1: Type Error: 'byte' type must be an integer between 0 and 255."
    );
}

#[test]
fn byte_reassignment_is_range_checked_and_value_kept() {
    let output = interpret("byte b = 5\nb = 300\nprint b");
    assert_eq!(
        output,
        "Line 2: Type Error: 'byte' type must be an integer between 0 and 255.\n00000101"
    );
}

#[test]
fn byte_arithmetic_behaves_as_integer() {
    assert_eq!(interpret("byte b = 5\nb = b + 1\nprint b"), "00000110");
    assert_eq!(interpret("byte b = 6\nprint b + 1"), "7");
}

#[test]
fn char_requires_a_single_character() {
    assert_eq!(
        interpret("char c = \"ab\""),
        "Line 1: Type Error: 'char' type must be a single character."
    );
    assert_eq!(interpret("char c = \"a\"\nprint type(c)"), "char");
}

#[test]
fn single_quoted_strings_are_accepted() {
    assert_eq!(interpret("char c = 'z'\nprint c"), "z");
    assert_eq!(interpret("print 'hello'"), "hello");
}

#[test]
fn const_reassignment_fails_and_value_is_unchanged() {
    let output = interpret("const x = 5\nx = 6\nprint x");
    assert_eq!(
        output,
        "Line 2: Type Error: Cannot reassign to constant variable 'x'.\n5"
    );
}

#[test]
fn redeclaring_with_a_modifier_is_a_syntax_error() {
    assert_eq!(
        interpret("x = 1\nconst x = 2"),
        "Line 2: Syntax Error: Cannot redeclare variable 'x' with modifier 'const'."
    );
    assert_eq!(
        interpret("x = 1\nprivate x = 2"),
        "Line 2: Syntax Error: Cannot redeclare variable 'x' with modifier 'private'."
    );
}

#[test]
fn changing_the_type_of_an_existing_variable_fails() {
    assert_eq!(
        interpret("x = 1\nint x = 2"),
        "Line 2: Syntax Error: Cannot change the type of an existing variable 'x'."
    );
}

#[test]
fn unsupported_type_annotation_is_rejected() {
    assert_eq!(
        interpret("foo x = 1"),
        "Line 1: Type Error: Unsupported type 'foo'."
    );
}

#[test]
fn types_are_inferred_from_the_evaluated_value() {
    assert_eq!(interpret("x = 5\nprint type(x)"), "int");
    assert_eq!(interpret("x = 2.5\nprint type(x)"), "float");
    assert_eq!(interpret("x = true\nprint type(x)"), "bool");
    assert_eq!(interpret("x = \"a\"\nprint type(x)"), "char");
    assert_eq!(interpret("x = \"abc\"\nprint type(x)"), "string");
}

#[test]
fn bool_coerces_from_true_false_strings() {
    assert_eq!(interpret("bool f = \"False\"\nprint f"), "False");
    assert_eq!(interpret("bool t = \"TRUE\"\nprint t"), "True");
    assert_eq!(
        interpret("bool t = \"yes\""),
        "Line 1: Type Error: Cannot cast string 'yes' to bool."
    );
}

#[test]
fn reassignment_coerces_to_the_existing_type() {
    assert_eq!(interpret("bool t = true\nt = \"false\"\nprint t"), "False");
}

#[test]
fn unvalidated_declared_types_pass_values_through() {
    // Only bool, char, and byte carry validation rules
    assert_eq!(interpret("int x = \"hello\"\nprint x"), "hello");
}

#[test]
fn unmatched_closing_brace_does_not_stop_the_run() {
    assert_eq!(
        interpret("}\nprint 1"),
        "Line 1: Syntax Error: Unmatched closing brace '}'.\n1"
    );
}

#[test]
fn block_variables_are_destroyed_on_scope_exit() {
    let output = interpret("{\nprivate x = 1\nprint x\n}\nprint x");
    assert_eq!(output, "1\nError: Undefined variable 'x'");
}

#[test]
fn nested_blocks_resolve_outward() {
    let script = "{\nprivate a = 1\n{\nprivate b = 2\nprint a + b\n}\nprint b\n}";
    assert_eq!(interpret(script), "3\nError: Undefined variable 'b'");
}

#[test]
fn private_outside_a_block_binds_globally() {
    assert_eq!(interpret("private x = 1\nprint x"), "1");
}

#[test]
fn unmodified_declarations_inside_a_block_bind_globally() {
    // Without 'private' the binding targets global scope even in a block
    assert_eq!(interpret("{\nx = 7\n}\nprint x"), "7");
}

#[test]
fn interpretation_is_idempotent_across_fresh_instances() {
    let script = "byte b = 200\nconst greeting = \"hi\"\n{\nprivate t = true\nprint b, greeting, t\n}\nprint b";
    assert_eq!(interpret(script), interpret(script));
}

#[test]
fn comments_are_stripped_outside_string_literals() {
    assert_eq!(interpret("x = 1 # a declaration\nprint x # show it"), "1");
    assert_eq!(interpret("print \"#not a comment\""), "#not a comment");
    assert_eq!(interpret("# a full comment line"), "");
}

#[test]
fn division_always_yields_a_float() {
    assert_eq!(interpret("print 4 / 2"), "2.0");
    assert_eq!(interpret("print 5 / 2"), "2.5");
}

#[test]
fn division_by_zero_renders_inline() {
    assert_eq!(interpret("print 1 / 0"), "Error: Division by zero");
    assert_eq!(interpret("print 1 / 0.0"), "Error: Division by zero");
    assert_eq!(interpret("print 1.0 / 0.0"), "Error: Division by zero");
    assert_eq!(interpret("print 1.0 / 0"), "Error: Division by zero");
}

#[test]
fn modulo_by_zero_is_an_error_for_every_operand_mix() {
    assert_eq!(interpret("print 5 % 0"), "Error: Modulo by zero");
    assert_eq!(interpret("print 5 % 0.0"), "Error: Modulo by zero");
    assert_eq!(interpret("print 5.0 % 0.0"), "Error: Modulo by zero");
    assert_eq!(interpret("print 5.0 % 0"), "Error: Modulo by zero");
}

#[test]
fn integer_overflow_is_an_error_and_the_run_continues() {
    assert_eq!(
        interpret("x = 9223372036854775807\nprint x + 1\nprint x - 1"),
        "Error: Integer overflow\n9223372036854775806"
    );
    assert_eq!(
        interpret("x = 9223372036854775807\nprint x * 2"),
        "Error: Integer overflow"
    );
    assert_eq!(
        interpret("x = -9223372036854775807\nprint x - 2"),
        "Error: Integer overflow"
    );
}

#[test]
fn negating_the_smallest_integer_is_an_error() {
    let script = "x = -9223372036854775807\nx = x - 1\nprint -x\nprint !x\nprint x";
    assert_eq!(
        interpret(script),
        "Error: Integer overflow\nError: Integer overflow\n-9223372036854775808"
    );
}

#[test]
fn caret_is_bitwise_xor_with_low_precedence() {
    assert_eq!(interpret("print 6 ^ 3"), "5");
    // '+' binds tighter than '^'
    assert_eq!(interpret("print 1 + 2 ^ 3"), "0");
}

#[test]
fn modulo_and_unary_operators() {
    assert_eq!(interpret("print 7 % 3"), "1");
    assert_eq!(interpret("print -5 + 10"), "5");
    assert_eq!(interpret("print +5"), "5");
}

#[test]
fn inversion_negates_booleans_and_numbers() {
    assert_eq!(interpret("print !true"), "False");
    assert_eq!(interpret("print !5"), "-5");
    assert_eq!(interpret("print invert(false)"), "True");
}

#[test]
fn inverting_a_char_stays_a_char() {
    assert_eq!(interpret("char c = \"a\"\nprint type(!c)"), "char");
    // Inverting twice restores the original code point
    assert_eq!(interpret("char c = \"a\"\nprint !!c"), "a");
}

#[test]
fn string_concatenation_including_chars() {
    assert_eq!(interpret("print \"foo\" + \"bar\""), "foobar");
    assert_eq!(interpret("char c = \"a\"\nprint c + \"bc\""), "abc");
}

#[test]
fn inequality_operator_is_tokenized_but_unsupported() {
    let output = interpret("print 1 != 2");
    assert_eq!(
        output,
        "Error: The '!=' operator is not supported in expressions"
    );
}

#[test]
fn failing_print_argument_renders_inline() {
    assert_eq!(
        interpret("print 1, nosuch, 3"),
        "1 Error: Undefined variable 'nosuch' 3"
    );
}

#[test]
fn missing_print_expression_is_a_syntax_error() {
    assert_eq!(
        interpret("print"),
        "Line 1: Syntax Error: Missing expression in print statement."
    );
    assert_eq!(
        interpret("print()"),
        "Line 1: Syntax Error: Missing expression in print statement."
    );
}

#[test]
fn unrecognized_lines_are_reported_with_their_text() {
    assert_eq!(interpret("foo bar"), "Line 1: Unknown command: foo bar");
}

#[test]
fn commas_inside_quotes_and_parens_are_not_split_points() {
    assert_eq!(interpret("print \"a, b\", 1"), "a, b 1");
    assert_eq!(interpret("print type(1), 2"), "int 2");
}

#[test]
fn float_output_keeps_a_decimal_point() {
    assert_eq!(interpret("x = 5.0\nprint x"), "5.0");
    assert_eq!(interpret("print 2.5 * 2"), "5.0");
}

#[test]
fn eval_expr_reads_current_scope_state() {
    let mut interpreter = Interpreter::new();
    interpreter.run("x = 40");
    assert_eq!(interpreter.eval_expr("x + 2").unwrap(), Value::Int(42));
    assert_eq!(
        interpreter.eval_expr("type(x)").unwrap(),
        Value::Str("int".to_string())
    );
}

#[test]
fn non_builtin_calls_are_rejected() {
    assert_eq!(
        interpret("print len(\"abc\")"),
        "Error: Unsupported function: 'len'"
    );
}

#[test]
fn builtin_arity_is_checked() {
    assert_eq!(
        interpret("print type(1, 2)"),
        "Error: type() takes exactly 1 argument, got 2"
    );
}
