//! Model views
//!
//! The standard pages generated by a
//! [`ModelViewSet`](crate::viewsets::ModelViewSet). All of them share the
//! view set's configuration and reach the data through its repository.
//!
//! | View     | Path            | Methods    |
//! |----------|-----------------|------------|
//! | `list`   | `/`             | GET        |
//! | `create` | `/create`       | GET, POST  |
//! | `edit`   | `/{pk}`         | GET, POST  |
//! | `detail` | `/{pk}/detail`  | GET        |
//! | `delete` | `/{pk}/delete`  | GET, POST  |

use axum::extract::{Form, Path, RawQuery};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, MethodRouter};
use axum_htmx::{HxHistoryRestoreRequest, HxRequest};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::{View, ViewContext, ViewKind};
use crate::breadcrumbs::BreadcrumbItem;
use crate::error::{AdminError, RepositoryError};
use crate::fields::Field;
use crate::forms::{FormSchema, FormValues, ValidationErrors};
use crate::listing::{ColumnHeader, ListParams, Pagination, QueryString, SortingState};
use crate::repository::{ListQuery, Repository};
use crate::template::{
    DeletePage, DetailPage, DetailRow, FormPage, HxTemplate, ListPage, ListRow, PageContext,
};

/// Name of the list view
pub const LIST: &str = "list";
/// Name of the create view
pub const CREATE: &str = "create";
/// Name of the edit view
pub const EDIT: &str = "edit";
/// Name of the detail view
pub const DETAIL: &str = "detail";
/// Name of the delete view
pub const DELETE: &str = "delete";

/// Submitted form pairs, in request order
type Submission = Vec<(String, String)>;

/// Configuration shared by the views of one model view set
pub(crate) struct ModelConfig<R: Repository> {
    pub(crate) repository: R,
    pub(crate) list_fields: Vec<Field>,
    pub(crate) detail_fields: Vec<Field>,
    pub(crate) query_fields: Vec<String>,
    pub(crate) form: Option<FormSchema>,
    pub(crate) page_size: Option<u64>,
}

impl<R: Repository> ModelConfig<R> {
    pub(crate) const fn new(repository: R) -> Self {
        Self {
            repository,
            list_fields: Vec::new(),
            detail_fields: Vec::new(),
            query_fields: Vec::new(),
            form: None,
            page_size: None,
        }
    }

    /// Detail fields, falling back to the list fields
    fn detail_fields(&self) -> &[Field] {
        if self.detail_fields.is_empty() {
            &self.list_fields
        } else {
            &self.detail_fields
        }
    }

    fn schema(&self) -> Result<&FormSchema, AdminError> {
        self.form
            .as_ref()
            .ok_or_else(|| AdminError::Configuration("model view set has no form".into()))
    }

    async fn load(&self, pk: &str) -> Result<R::Model, AdminError> {
        self.repository
            .get_by_pk(pk)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("no item with primary key '{pk}'")))
    }
}

fn to_json<M: Serialize>(item: &M) -> Result<Value, AdminError> {
    serde_json::to_value(item).map_err(|err| {
        AdminError::from(RepositoryError::Backend(format!(
            "item serialization failed: {err}"
        )))
    })
}

/// Link to the page of one item: edit when it exists, detail otherwise
fn item_url(ctx: &ViewContext, pk: &str) -> Result<Option<String>, AdminError> {
    match ctx.sibling_url(EDIT, &[("pk", pk)])? {
        Some(url) => Ok(Some(url)),
        None => ctx.sibling_url(DETAIL, &[("pk", pk)]),
    }
}

fn list_url(ctx: &ViewContext) -> Result<String, AdminError> {
    ctx.url_for(&ctx.sibling(LIST), &[])
}

/// Whether a repository error should be shown inside the form
const fn is_form_error(err: &RepositoryError) -> bool {
    matches!(err, RepositoryError::Conflict(_) | RepositoryError::Invalid(_))
}

/// Paginated, sortable, searchable table of items
pub struct ListView<R: Repository> {
    config: Arc<ModelConfig<R>>,
    title: String,
}

impl<R: Repository> ListView<R> {
    pub(crate) fn new(config: Arc<ModelConfig<R>>, title: impl Into<String>) -> Self {
        Self {
            config,
            title: title.into(),
        }
    }

    async fn render(
        &self,
        ctx: &ViewContext,
        is_htmx: bool,
        raw_query: Option<&str>,
    ) -> Result<Response, AdminError> {
        let config = &self.config;
        let listing = ctx.site.config.listing;
        let query = QueryString::parse(raw_query)?;
        let params = ListParams::from_query(
            &query,
            config.page_size.unwrap_or(listing.default_page_size),
            listing.max_page_size,
        )?;

        let sortable: Vec<&str> = config
            .list_fields
            .iter()
            .filter(|field| field.sortable)
            .map(|field| field.key.as_str())
            .collect();
        let sorting = SortingState::parse(params.sorting.as_deref(), &sortable);

        let mut list_query = ListQuery::new(params.offset, params.limit);
        list_query.sorting = sorting.to_sorting();
        let search_enabled = !config.query_fields.is_empty();
        if let Some(text) = params.query.as_deref().filter(|_| search_enabled) {
            list_query = list_query.search(text, config.query_fields.iter().cloned());
        }

        let result = config.repository.list(&list_query).await?;
        tracing::debug!(
            route = %ctx.route_name,
            offset = params.offset,
            limit = params.limit,
            total = result.total,
            "Listed items"
        );

        let path = ctx.own_url(&[])?;
        let headers = if config.list_fields.is_empty() {
            vec![ColumnHeader {
                key: String::new(),
                label: "Item".into(),
                sortable: false,
                order: String::new(),
                position: String::new(),
                toggle_url: String::new(),
            }]
        } else {
            ColumnHeader::for_fields(&config.list_fields, &sorting, &path, &query)
        };

        let mut rows = Vec::with_capacity(result.items.len());
        for item in &result.items {
            let pk = config.repository.get_pk(item);
            let cells = if config.list_fields.is_empty() {
                vec![config.repository.get_title(item)]
            } else {
                let json = to_json(item)?;
                config
                    .list_fields
                    .iter()
                    .map(|field| field.render(&json))
                    .collect()
            };
            rows.push(ListRow {
                url: item_url(ctx, &pk)?.unwrap_or_default(),
                cells,
            });
        }

        let pagination = Pagination::new(params.offset, params.limit, result.total);
        let page = ListPage {
            page: ctx.page(self.title.clone(), Vec::new()),
            headers,
            rows,
            total: pagination.total,
            first_item: pagination.first_item(),
            last_item: pagination.last_item(),
            previous_url: pagination.previous_url(&path, &query).unwrap_or_default(),
            next_url: pagination.next_url(&path, &query).unwrap_or_default(),
            search_enabled,
            query: params.query.unwrap_or_default(),
            sorting: sorting.encode(),
            limit: query
                .get("limit")
                .map(|_| params.limit.to_string())
                .unwrap_or_default(),
            list_url: path,
            create_url: ctx.sibling_url(CREATE, &[])?.unwrap_or_default(),
        };

        Ok(page.render_htmx(is_htmx)?.into_response())
    }
}

impl<R: Repository> View for ListView<R> {
    fn name(&self) -> &str {
        LIST
    }

    fn path(&self) -> &str {
        "/"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ViewKind {
        ViewKind::List
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        let ctx = Arc::new(ctx);
        get(
            move |HxRequest(is_htmx): HxRequest,
                  HxHistoryRestoreRequest(is_restore): HxHistoryRestoreRequest,
                  RawQuery(raw_query): RawQuery| async move {
                // A history restore swaps the response into `<body>`
                let fragment = is_htmx && !is_restore;
                self.render(&ctx, fragment, raw_query.as_deref()).await
            },
        )
    }
}

/// Read-only page of one item
pub struct DetailView<R: Repository> {
    config: Arc<ModelConfig<R>>,
}

impl<R: Repository> DetailView<R> {
    pub(crate) const fn new(config: Arc<ModelConfig<R>>) -> Self {
        Self { config }
    }

    async fn render(&self, ctx: &ViewContext, pk: &str) -> Result<Response, AdminError> {
        let item = self.config.load(pk).await?;
        let json = to_json(&item)?;
        let title = self.config.repository.get_title(&item);

        let rows = self
            .config
            .detail_fields()
            .iter()
            .map(|field| DetailRow {
                label: field.label.clone(),
                value: field.render(&json),
                copyable: field.copyable,
            })
            .collect();

        let page = DetailPage {
            page: ctx.page(title.clone(), vec![BreadcrumbItem::current(title)]),
            rows,
            edit_url: ctx.sibling_url(EDIT, &[("pk", pk)])?.unwrap_or_default(),
            delete_url: ctx.sibling_url(DELETE, &[("pk", pk)])?.unwrap_or_default(),
            list_url: list_url(ctx)?,
        };
        Ok(page.render_html()?.into_response())
    }
}

impl<R: Repository> View for DetailView<R> {
    fn name(&self) -> &str {
        DETAIL
    }

    fn path(&self) -> &str {
        "/{pk}/detail"
    }

    fn title(&self) -> &str {
        "Details"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Detail
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        let ctx = Arc::new(ctx);
        get(move |Path(pk): Path<String>| async move { self.render(&ctx, &pk).await })
    }
}

/// Everything needed to show a create or edit form
struct FormState<'a> {
    page: PageContext,
    action: String,
    values: FormValues,
    errors: ValidationErrors,
    cancel_url: String,
    delete_url: String,
    status: StatusCode,
    schema: &'a FormSchema,
}

impl FormState<'_> {
    fn render(self) -> Result<Response, AdminError> {
        let form = self
            .schema
            .to_builder(self.action, &self.values, &self.errors)
            .id("admin-form")
            .submit("Save")
            .build();

        let page = FormPage {
            page: self.page,
            form,
            cancel_url: self.cancel_url,
            delete_url: self.delete_url,
        };
        Ok((self.status, page.render_html()?).into_response())
    }
}

/// Form creating a new item
pub struct CreateView<R: Repository> {
    config: Arc<ModelConfig<R>>,
}

impl<R: Repository> CreateView<R> {
    pub(crate) const fn new(config: Arc<ModelConfig<R>>) -> Self {
        Self { config }
    }

    fn form(
        &self,
        ctx: &ViewContext,
        values: FormValues,
        errors: ValidationErrors,
        status: StatusCode,
    ) -> Result<FormState<'_>, AdminError> {
        Ok(FormState {
            page: ctx.page("Create", Vec::new()),
            action: ctx.own_url(&[])?,
            values,
            errors,
            cancel_url: list_url(ctx)?,
            delete_url: String::new(),
            status,
            schema: self.config.schema()?,
        })
    }

    fn show(&self, ctx: &ViewContext) -> Result<Response, AdminError> {
        self.form(ctx, FormValues::new(), ValidationErrors::new(), StatusCode::OK)?
            .render()
    }

    async fn submit(&self, ctx: &ViewContext, submitted: Submission) -> Result<Response, AdminError> {
        let schema = self.config.schema()?;
        let values = FormSchema::submitted_form_values(&submitted);

        let record = match schema.parse(&submitted) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(route = %ctx.route_name, errors = errors.count(), "Form validation failed");
                return self.form(ctx, values, errors, StatusCode::BAD_REQUEST)?.render();
            }
        };

        match self.config.repository.create(record).await {
            Ok(item) => {
                let pk = self.config.repository.get_pk(&item);
                tracing::info!(route = %ctx.route_name, %pk, "Item created");
                Ok(Redirect::to(&list_url(ctx)?).into_response())
            }
            Err(err) if is_form_error(&err) => {
                let status = err.status_code();
                let mut errors = ValidationErrors::new();
                errors.add_form_error(err.to_string());
                self.form(ctx, values, errors, status)?.render()
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: Repository> View for CreateView<R> {
    fn name(&self) -> &str {
        CREATE
    }

    fn path(&self) -> &str {
        "/create"
    }

    fn title(&self) -> &str {
        "Create"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Create
    }

    fn check(&self) -> Result<(), AdminError> {
        self.config.schema()?.check()
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        let ctx = Arc::new(ctx);
        let view = Arc::clone(&self);
        let post_ctx = Arc::clone(&ctx);
        get(move || async move { self.show(&ctx) }).post(
            move |Form(submitted): Form<Submission>| async move {
                view.submit(&post_ctx, submitted).await
            },
        )
    }
}

/// Form changing an existing item
pub struct EditView<R: Repository> {
    config: Arc<ModelConfig<R>>,
}

impl<R: Repository> EditView<R> {
    pub(crate) const fn new(config: Arc<ModelConfig<R>>) -> Self {
        Self { config }
    }

    fn form(
        &self,
        ctx: &ViewContext,
        item: &R::Model,
        pk: &str,
        values: FormValues,
        errors: ValidationErrors,
        status: StatusCode,
    ) -> Result<FormState<'_>, AdminError> {
        let title = self.config.repository.get_title(item);
        Ok(FormState {
            page: ctx.page(format!("Edit {title}"), vec![BreadcrumbItem::current(title)]),
            action: ctx.own_url(&[("pk", pk)])?,
            values,
            errors,
            cancel_url: list_url(ctx)?,
            delete_url: ctx.sibling_url(DELETE, &[("pk", pk)])?.unwrap_or_default(),
            status,
            schema: self.config.schema()?,
        })
    }

    async fn show(&self, ctx: &ViewContext, pk: &str) -> Result<Response, AdminError> {
        let schema = self.config.schema()?;
        let item = self.config.load(pk).await?;
        let values = schema.initial_values(&to_json(&item)?);
        self.form(ctx, &item, pk, values, ValidationErrors::new(), StatusCode::OK)?
            .render()
    }

    async fn submit(
        &self,
        ctx: &ViewContext,
        pk: &str,
        submitted: Submission,
    ) -> Result<Response, AdminError> {
        let schema = self.config.schema()?;
        let item = self.config.load(pk).await?;

        // Read-only and disabled fields are never submitted; show the stored values
        let mut values = FormSchema::submitted_form_values(&submitted);
        for (name, value) in schema.initial_values(&to_json(&item)?) {
            if schema.get(&name).is_some_and(|field| field.is_ignored()) {
                values.insert(name, value);
            }
        }

        let record = match schema.parse(&submitted) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(route = %ctx.route_name, %pk, errors = errors.count(), "Form validation failed");
                return self
                    .form(ctx, &item, pk, values, errors, StatusCode::BAD_REQUEST)?
                    .render();
            }
        };

        match self.config.repository.update(pk, record).await {
            Ok(_) => {
                tracing::info!(route = %ctx.route_name, %pk, "Item updated");
                Ok(Redirect::to(&list_url(ctx)?).into_response())
            }
            Err(err) if is_form_error(&err) => {
                let status = err.status_code();
                let mut errors = ValidationErrors::new();
                errors.add_form_error(err.to_string());
                self.form(ctx, &item, pk, values, errors, status)?.render()
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: Repository> View for EditView<R> {
    fn name(&self) -> &str {
        EDIT
    }

    fn path(&self) -> &str {
        "/{pk}"
    }

    fn title(&self) -> &str {
        "Edit"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Edit
    }

    fn check(&self) -> Result<(), AdminError> {
        self.config.schema()?.check()
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        let ctx = Arc::new(ctx);
        let view = Arc::clone(&self);
        let post_ctx = Arc::clone(&ctx);
        get(move |Path(pk): Path<String>| async move { self.show(&ctx, &pk).await }).post(
            move |Path(pk): Path<String>, Form(submitted): Form<Submission>| async move {
                view.submit(&post_ctx, &pk, submitted).await
            },
        )
    }
}

/// Delete confirmation
pub struct DeleteView<R: Repository> {
    config: Arc<ModelConfig<R>>,
}

impl<R: Repository> DeleteView<R> {
    pub(crate) const fn new(config: Arc<ModelConfig<R>>) -> Self {
        Self { config }
    }

    async fn show(&self, ctx: &ViewContext, pk: &str) -> Result<Response, AdminError> {
        let item = self.config.load(pk).await?;
        let title = self.config.repository.get_title(&item);
        let item_url = item_url(ctx, pk)?.unwrap_or_default();

        let page = DeletePage {
            page: ctx.page(
                format!("Delete {title}"),
                vec![
                    BreadcrumbItem::new(title.clone(), item_url.clone()),
                    BreadcrumbItem::current("Delete"),
                ],
            ),
            item_title: title,
            action_url: ctx.own_url(&[("pk", pk)])?,
            cancel_url: if item_url.is_empty() {
                list_url(ctx)?
            } else {
                item_url
            },
        };
        Ok(page.render_html()?.into_response())
    }

    async fn submit(&self, ctx: &ViewContext, pk: &str) -> Result<Response, AdminError> {
        self.config.repository.delete(pk).await?;
        tracing::info!(route = %ctx.route_name, %pk, "Item deleted");
        Ok(Redirect::to(&list_url(ctx)?).into_response())
    }
}

impl<R: Repository> View for DeleteView<R> {
    fn name(&self) -> &str {
        DELETE
    }

    fn path(&self) -> &str {
        "/{pk}/delete"
    }

    fn title(&self) -> &str {
        "Delete"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Delete
    }

    fn method_router(self: Arc<Self>, ctx: ViewContext) -> MethodRouter {
        let ctx = Arc::new(ctx);
        let view = Arc::clone(&self);
        let post_ctx = Arc::clone(&ctx);
        get(move |Path(pk): Path<String>| async move { self.show(&ctx, &pk).await }).post(
            move |Path(pk): Path<String>| async move { view.submit(&post_ctx, &pk).await },
        )
    }
}
