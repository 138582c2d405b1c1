use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod process;

#[proc_macro_derive(Model, attributes(field))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident;

    let fields = match input.data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => &fields.named,
            _ => panic!("Model derive macro only supports structs with named fields"),
        },
        _ => panic!("Model derive macro only supports structs"),
    };

    let process::Output {
        primary_key,
        default_fields,
        schema_fields,
        create_args,
        update_args,
    } = process::process_fields(fields);

    let primary_key = match primary_key {
        Some(pk) => pk,
        None => panic!("Model derive macro needs one field marked `primary_key = true`"),
    };

    let up = format!(
        "create table if not exists {name} ({fields});",
        fields = schema_fields.join(", ")
    );
    let down = format!("drop table if exists {name};");

    let expanded = quote! {
        #[bookshelf_orm::async_trait::async_trait]
        impl bookshelf_orm::db::model::Model for #name {
            const NAME: &'static str = stringify!(#name);
            const PK: &'static str = stringify!(#primary_key);
            const UP: &'static str = #up;
            const DOWN: &'static str = #down;

            async fn save(&self, conn: &bookshelf_orm::Connection) -> Result<(), bookshelf_orm::Error> {
                <Self as bookshelf_orm::db::model::Model>::create(
                    <Self as bookshelf_orm::db::model::Model>::create_kwargs(self),
                    conn,
                )
                .await
            }

            fn create_kwargs(&self) -> Vec<bookshelf_orm::db::query::condition::Kwargs> {
                bookshelf_orm::kwargs!(#(#create_args = self.#create_args),*)
            }

            async fn update(&self, conn: &bookshelf_orm::Connection) -> Result<(), bookshelf_orm::Error> {
                <Self as bookshelf_orm::db::model::Model>::set(
                    &self.#primary_key,
                    bookshelf_orm::kwargs!(#(#update_args = self.#update_args),*),
                    conn,
                )
                .await
            }

            async fn delete(&self, conn: &bookshelf_orm::Connection) -> Result<(), bookshelf_orm::Error> {
                let query = format!(
                    "delete from {} where {}={}1;",
                    Self::NAME,
                    Self::PK,
                    bookshelf_orm::db::PLACEHOLDER,
                );
                bookshelf_orm::sqlx::query(&query)
                    .bind(self.#primary_key.clone())
                    .execute(conn)
                    .await?;
                Ok(())
            }
        }

        impl Default for #name {
            fn default() -> Self {
                Self {#(#default_fields),*}
            }
        }

        bookshelf_orm::inventory::submit! {
            bookshelf_orm::MigrationRegistrar {
                name: stringify!(#name),
                migrate_fn: <#name as bookshelf_orm::db::model::Model>::migrate,
                reset_fn: <#name as bookshelf_orm::db::model::Model>::reset,
            }
        }
    };

    expanded.into()
}
