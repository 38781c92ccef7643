use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive macro that generates a column-oriented companion table for a
/// per-row struct. All fields in the source struct must be `f64`.
///
/// The generated table has the same fields as `Vec<f64>` columns, along with
/// `with_capacity`, `push`, `len`, `is_empty`, `row`, `column` and `columns`.
/// A `column_names()` associated function is added to the row struct.
///
/// Use `#[timeseries(name = "CustomName")]` to override the default table
/// name (`{StructName}Timeseries`).
#[proc_macro_derive(Timeseries, attributes(timeseries))]
pub fn derive_timeseries(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let table_name =
        extract_table_name(&input).unwrap_or_else(|| format_ident!("{}Timeseries", name));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Timeseries can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Timeseries can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "Timeseries struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut column_names = Vec::new();
    let mut field_idents = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "Timeseries derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        column_names.push(ident.to_string());
        field_idents.push(ident);
    }

    let first_field = &field_idents[0];
    let n_columns = field_idents.len();
    let column_name_strs: Vec<&str> = column_names.iter().map(|s| s.as_str()).collect();

    let table_fields = field_idents.iter().map(|f| quote! { pub #f: Vec<f64> });
    let with_cap_fields = field_idents
        .iter()
        .map(|f| quote! { #f: Vec::with_capacity(n) });
    let push_fields = field_idents.iter().map(|f| quote! { self.#f.push(r.#f); });
    let row_fields = field_idents.iter().map(|f| quote! { #f: self.#f[i] });
    let column_arms = field_idents
        .iter()
        .zip(&column_name_strs)
        .map(|(f, s)| quote! { #s => Some(self.#f.as_slice()) });
    let columns_entries = field_idents
        .iter()
        .zip(&column_name_strs)
        .map(|(f, s)| quote! { (#s, self.#f.as_slice()) });

    let expanded = quote! {
        /// Column-oriented table with one `Vec<f64>` per field of the row type.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct #table_name {
            #(#table_fields,)*
        }

        impl #table_name {
            /// Pre-allocate every column for `n` rows.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            /// Append a single row.
            pub fn push(&mut self, r: &#name) {
                #(#push_fields)*
            }

            /// Number of rows stored.
            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            /// Returns `true` if no rows have been stored.
            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }

            /// Reassemble row `i`, or `None` past the end.
            pub fn row(&self, i: usize) -> Option<#name> {
                if i >= self.len() {
                    return None;
                }
                Some(#name {
                    #(#row_fields,)*
                })
            }

            /// Look up a column by field name.
            pub fn column(&self, name: &str) -> Option<&[f64]> {
                match name {
                    #(#column_arms,)*
                    _ => None,
                }
            }

            /// All columns in declaration order, paired with their names.
            pub fn columns(&self) -> [(&'static str, &[f64]); #n_columns] {
                [#(#columns_entries),*]
            }
        }

        impl #name {
            /// Returns the column names of the generated table, in order.
            pub fn column_names() -> &'static [&'static str] {
                &[#(#column_name_strs),*]
            }
        }
    };

    expanded.into()
}

fn extract_table_name(input: &DeriveInput) -> Option<proc_macro2::Ident> {
    for attr in &input.attrs {
        if attr.path().is_ident("timeseries") {
            let nested = attr
                .parse_args_with(
                    syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
                )
                .ok()?;
            for meta in nested {
                if let Meta::NameValue(nv) = meta {
                    if nv.path.is_ident("name") {
                        if let syn::Expr::Lit(expr_lit) = &nv.value {
                            if let Lit::Str(lit_str) = &expr_lit.lit {
                                return Some(format_ident!("{}", lit_str.value()));
                            }
                        }
                    }
                }
            }
        }
    }
    None
}

fn is_f64_type(ty: &syn::Type) -> bool {
    if let syn::Type::Path(type_path) = ty {
        type_path.path.is_ident("f64")
    } else {
        false
    }
}
