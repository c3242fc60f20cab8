//! Procedural macros for testkit-doubles
//!
//! This crate provides the `#[testkit_doubles::test]` attribute macro, which
//! hands a test a `TestScope` and verifies every double created through it
//! once the test body returns.
//!
//! # Example
//!
//! ```rust,ignore
//! use testkit_doubles::prelude::*;
//!
//! #[testkit_doubles::test]
//! fn my_test(scope: TestScope) {
//!     let store = scope.double(Contract::new("Store", ["get"]));
//!     store.expect_once("get").unwrap();
//!     store.call("get", values!["key"]).unwrap();
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, FnArg, Ident, ItemFn, Lit, Pat, ReturnType, Token, Type,
};

/// Configuration options for the test macro.
struct TestConfig {
    /// Whether to verify the scope's doubles after the body (default: true)
    verify: bool,
    /// Flavor for the tokio runtime of async tests ("current_thread" or "multi_thread")
    flavor: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            verify: true,
            flavor: None,
        }
    }
}

impl Parse for TestConfig {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut config = TestConfig::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "verify" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Bool(b) => config.verify = b.value(),
                        other => {
                            return Err(syn::Error::new_spanned(other, "expected `true` or `false`"))
                        }
                    }
                }
                "flavor" => {
                    let lit: Lit = input.parse()?;
                    match lit {
                        Lit::Str(s) => match s.value().as_str() {
                            "current_thread" | "multi_thread" => config.flavor = Some(s.value()),
                            _ => {
                                return Err(syn::Error::new_spanned(
                                    s,
                                    "flavor must be \"current_thread\" or \"multi_thread\"",
                                ))
                            }
                        },
                        other => {
                            return Err(syn::Error::new_spanned(other, "expected a string"));
                        }
                    }
                }
                _ => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {ident}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(config)
    }
}

/// Determines if a function parameter is requesting a TestScope.
fn is_scope_param(arg: &FnArg) -> bool {
    if let FnArg::Typed(pat_type) = arg {
        if let Type::Path(type_path) = &*pat_type.ty {
            if let Some(segment) = type_path.path.segments.last() {
                return segment.ident == "TestScope";
            }
        }
    }
    false
}

/// Extracts the parameter name from a function argument.
fn get_param_name(arg: &FnArg) -> Option<&Pat> {
    if let FnArg::Typed(pat_type) = arg {
        Some(&pat_type.pat)
    } else {
        None
    }
}

/// Test attribute macro that verifies test doubles at teardown.
///
/// Works on both plain and `async` test functions. Async tests run on tokio,
/// so the calling crate needs `tokio` with the `macros` and `rt` features.
///
/// # With TestScope Injection
///
/// Add a `scope: TestScope` parameter to receive a fresh scope. Every double
/// created through it is verified after the body returns. Outcomes are logged
/// through `tracing`, and if any failed the test panics with every failure
/// listed:
///
/// ```rust,ignore
/// use testkit_doubles::prelude::*;
///
/// #[testkit_doubles::test]
/// fn test_with_scope(scope: TestScope) {
///     let double = scope.double(Contract::new("Dummy", ["a_method"]));
///     double.expect_never("a_method").unwrap();
/// }
/// ```
///
/// # Configuration Options
///
/// - `verify = false` - Skip verification at teardown
/// - `flavor = "multi_thread"` - Tokio runtime flavor for async tests
///
/// ```rust,ignore
/// #[testkit_doubles::test(flavor = "multi_thread")]
/// async fn test_async(scope: TestScope) {
///     let double = scope.double(Contract::new("Dummy", ["a_method"]));
///     tokio::spawn(async move { double.call("a_method", vec![]) }).await.unwrap().unwrap();
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let config = parse_macro_input!(attr as TestConfig);
    let input = parse_macro_input!(item as ItemFn);

    expand_test(&config, input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_test(config: &TestConfig, input: ItemFn) -> syn::Result<TokenStream2> {
    let name = &input.sig.ident;
    let body = &input.block;
    let attrs = &input.attrs;
    let vis = &input.vis;
    let output = &input.sig.output;
    let is_async = input.sig.asyncness.is_some();

    if let Some(arg) = input.sig.inputs.iter().find(|arg| !is_scope_param(arg)) {
        return Err(syn::Error::new_spanned(
            arg,
            "test functions may only take a `TestScope` parameter",
        ));
    }
    if input.sig.inputs.len() > 1 {
        return Err(syn::Error::new_spanned(
            &input.sig.inputs,
            "test functions take at most one `TestScope` parameter",
        ));
    }

    let result_ty = match output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => quote! { #ty },
    };

    let scope_name = input.sig.inputs.first().and_then(get_param_name);

    // Generate the body, wrapped so the scope can be finished afterwards
    let wrapped = match scope_name {
        None => quote! { #body },
        Some(scope_name) => {
            let run = if is_async {
                quote! { async move #body .await }
            } else {
                quote! { (move || -> #result_ty #body)() }
            };
            let finish = if config.verify {
                quote! {
                    __testkit_scope
                        .finish(&::testkit_doubles::report::TracingReporter)
                        .assert_passed();
                }
            } else {
                quote! {}
            };
            quote! {
                let #scope_name = ::testkit_doubles::scope::TestScope::new();
                let __testkit_scope = ::std::clone::Clone::clone(&#scope_name);
                let __testkit_result: #result_ty = #run;
                #finish
                __testkit_result
            }
        }
    };

    let test_attr = if is_async {
        match config.flavor.as_deref() {
            Some("multi_thread") => quote! { #[::tokio::test(flavor = "multi_thread")] },
            _ => quote! { #[::tokio::test] },
        }
    } else {
        quote! { #[::core::prelude::v1::test] }
    };
    let asyncness = if is_async { quote! { async } } else { quote! {} };

    Ok(quote! {
        #test_attr
        #(#attrs)*
        #vis #asyncness fn #name() #output {
            #wrapped
        }
    })
}
