use jtool_derive::BeanCopy;

pub struct UserEntity {
    pub id: u32,
    pub user_name: String,
    pub password: String,
}

#[derive(BeanCopy)]
#[bean(from = UserEntity)]
pub struct UserView {
    pub id: u64,
    #[bean(rename = "user_name")]
    pub name: String,
    #[bean(skip)]
    pub avatar: Option<String>,
}

fn main() {
    let entity = UserEntity { id: 7, user_name: "ada".to_owned(), password: "secret".to_owned() };
    let view = UserView::from(&entity);
    assert_eq!(view.id, 7);
    assert_eq!(view.name, "ada");
    assert!(view.avatar.is_none());
    assert_eq!(entity.password, "secret");
}
