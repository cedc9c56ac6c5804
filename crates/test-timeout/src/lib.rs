//! Test attributes that fail a test instead of letting it hang.
//!
//! `#[test_timeout::timeout]` wraps a synchronous test, `#[test_timeout::tokio_timeout_test]`
//! wraps an async one in a current-thread Tokio runtime. Both take an optional
//! timeout in seconds (default 30). `VOTEPAXOS_TEST_TIMEOUT_SECS` overrides the
//! value at run time, which is handy on slow CI runners.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Block, ItemFn, LitInt, parse_macro_input};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[proc_macro_attribute]
pub fn tokio_timeout_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let timeout_secs = match parse_timeout(attr) {
        Ok(secs) => secs,
        Err(err) => return err.to_compile_error().into(),
    };

    let ItemFn {
        attrs,
        vis,
        mut sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    if sig.asyncness.is_none() {
        return syn::Error::new_spanned(
            &sig.ident,
            "tokio_timeout_test can only be applied to async functions",
        )
        .to_compile_error()
        .into();
    }
    sig.asyncness = None;

    let attrs = strip_test_attrs(attrs, &["tokio", "test"]);
    let body = async_body(&block);
    let runner = guarded_runner(timeout_secs, body);

    TokenStream::from(quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            #runner
        }
    })
}

#[proc_macro_attribute]
pub fn timeout(attr: TokenStream, item: TokenStream) -> TokenStream {
    let timeout_secs = match parse_timeout(attr) {
        Ok(secs) => secs,
        Err(err) => return err.to_compile_error().into(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    if sig.asyncness.is_some() {
        return syn::Error::new_spanned(
            &sig.ident,
            "timeout attribute expects a synchronous test function; use tokio_timeout_test",
        )
        .to_compile_error()
        .into();
    }

    let attrs = strip_test_attrs(attrs, &["test"]);
    let runner = guarded_runner(timeout_secs, quote! { #block });

    TokenStream::from(quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            #runner
        }
    })
}

fn parse_timeout(attr: TokenStream) -> syn::Result<u64> {
    if attr.is_empty() {
        return Ok(DEFAULT_TIMEOUT_SECS);
    }
    let lit: LitInt = syn::parse(attr)?;
    let secs: u64 = lit.base10_parse()?;
    if secs == 0 {
        return Err(syn::Error::new_spanned(lit, "timeout must be greater than zero"));
    }
    Ok(secs)
}

/// Removes `#[test]` (or `#[tokio::test]`) so the generated `#[test]` is the only one.
fn strip_test_attrs(attrs: Vec<Attribute>, path: &[&str]) -> Vec<Attribute> {
    attrs
        .into_iter()
        .filter(|attr| {
            let segments: Vec<String> = attr
                .path()
                .segments
                .iter()
                .map(|segment| segment.ident.to_string())
                .collect();
            segments != path
        })
        .collect()
}

fn async_body(block: &Block) -> TokenStream2 {
    quote! {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build Tokio runtime");
        runtime.block_on(async {
            tokio::time::timeout(timeout_duration, async move #block)
                .await
                .expect("test timed out");
        });
    }
}

/// Runs `body` on a helper thread and fails the test if it does not report back
/// within the timeout. `timeout_duration` is in scope for `body`.
fn guarded_runner(default_secs: u64, body: TokenStream2) -> TokenStream2 {
    quote! {
        let timeout_secs: u64 = std::env::var("VOTEPAXOS_TEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(#default_secs);
        let timeout_duration = std::time::Duration::from_secs(timeout_secs);
        let (sender, receiver) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| { #body }));
            let _ = sender.send(result);
        });
        match receiver.recv_timeout(timeout_duration) {
            Ok(Ok(_)) => {}
            Ok(Err(payload)) => std::panic::resume_unwind(payload),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                panic!("test timed out after {timeout_secs}s")
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                panic!("test thread failed before reporting result")
            }
        }
    }
}
