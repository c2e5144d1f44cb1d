use momentum_shared::Employee;
use momentum_shared::model::image_src;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct EmployeeAvatarProps {
  pub employee: Employee
}

#[function_component(EmployeeAvatar)]
pub fn employee_avatar(props: &EmployeeAvatarProps) -> Html {
  let name = props.employee.full_name();
  match image_src(props.employee.avatar.as_deref()) {
    | Some(src) => html! {
      <img class="avatar" src={src} alt={name.clone()} title={name} />
    },
    | None => html! {
      <span class="avatar initials" title={name}>{ props.employee.initials() }</span>
    }
  }
}
