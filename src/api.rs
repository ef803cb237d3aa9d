//! 用户资源 API
//!
//! 每个函数都是固定路径 + HTTP 方法 + 透传调用方参数的薄封装，
//! 返回 `ApiClient` 得到的 Envelope。失败时记录日志并原样返回错误。

use serde_json::Value;
use tracing::{error, info};
use user_admin_shared::protocol::{PATH_LOGIN, PATH_LOGOUT, PATH_USER, PATH_USERS, user_path};
use user_admin_shared::{
    CurrentUser, Envelope, LoginRequest, LoginResponse, PageResponse, UserForm, UserQuery,
    UserRecord,
};

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::session::SessionStore;
use crate::token;

pub struct UserApi<C, S> {
    client: ApiClient<C, S>,
}

/// 记录失败日志后原样返回结果
fn logged<T>(operation: &str, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(e) = &result {
        error!(operation, error = %e, "{operation} failed");
    }
    result
}

impl<C: HttpClient, S: SessionStore> UserApi<C, S> {
    pub fn new(client: ApiClient<C, S>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<C, S> {
        &self.client
    }

    /// 用户登录
    ///
    /// 以表单方式提交；响应 data 中带有非空 `access_token` 时写入 token 存储。
    pub async fn login(&self, params: &LoginRequest) -> ApiResult<Envelope<LoginResponse>> {
        let result = self
            .client
            .post_form::<LoginResponse>(
                PATH_LOGIN,
                &[
                    ("username", params.username.as_str()),
                    ("password", params.password.as_str()),
                ],
            )
            .await;
        let env = logged("Login", result)?;

        let token = env
            .data
            .as_ref()
            .and_then(|data| data.access_token.as_deref())
            .filter(|token| !token.is_empty());
        if let Some(token) = token {
            self.client.session().set(token);
            info!(username = %params.username, "signed in");
        }
        Ok(env)
    }

    /// 用户注销
    ///
    /// 无论网络调用是否成功都会清除本地 token；失败时仍把原始错误返回给调用方。
    pub async fn logout(&self) -> ApiResult<Envelope> {
        let result = self.client.post::<(), Value>(PATH_LOGOUT, None, None).await;
        self.client.session().clear();
        logged("Logout", result)
    }

    /// 获取用户列表
    pub async fn get_user_list(
        &self,
        params: Option<&UserQuery>,
    ) -> ApiResult<Envelope<PageResponse<UserRecord>>> {
        let options = params.map(|q| RequestOptions::query(q.to_pairs()));
        logged("Get user list", self.client.get(PATH_USERS, options).await)
    }

    /// 创建用户
    pub async fn create_user(&self, user: &UserForm) -> ApiResult<Envelope<UserRecord>> {
        logged(
            "Create user",
            self.client.post(PATH_USER, Some(user), None).await,
        )
    }

    /// 获取用户详情
    pub async fn get_user_detail(&self, user_id: i64) -> ApiResult<Envelope<UserRecord>> {
        logged(
            "Get user detail",
            self.client.get(&user_path(user_id), None).await,
        )
    }

    /// `get_user_detail` 的别名，保留给按旧名称调用的代码
    pub async fn get_user_by_id(&self, user_id: i64) -> ApiResult<Envelope<UserRecord>> {
        self.get_user_detail(user_id).await
    }

    /// 更新用户
    pub async fn update_user(
        &self,
        user_id: i64,
        user: &UserForm,
    ) -> ApiResult<Envelope<UserRecord>> {
        logged(
            "Update user",
            self.client.put(&user_path(user_id), Some(user), None).await,
        )
    }

    /// 删除用户
    pub async fn delete_user(&self, user_id: i64) -> ApiResult<Envelope> {
        logged(
            "Delete user",
            self.client.delete(&user_path(user_id), None).await,
        )
    }

    /// 检查用户是否已登录（token 是否存在）
    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    /// 获取当前用户信息（从 token 载荷解析，不访问后端）
    pub fn get_current_user(&self) -> Envelope<CurrentUser> {
        token::current_user(self.client.session())
    }
}
